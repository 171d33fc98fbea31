use codspeed_criterion_compat::{criterion_group, criterion_main, Criterion};
use json_consumer::{
    marshal, unmarshal, write_byte, write_float, write_int, write_string, Consumer, Delim, End,
    Producer, Result, Skip, Stream, Token,
};
use std::io::{BufRead, Write};

#[derive(Default)]
struct Record {
    id: i64,
    name: String,
    score: f64,
    tags: Vec<Tag>,
}

#[derive(Default)]
struct Tag(String);

impl Consumer for Record {
    fn consume<R: BufRead>(&mut self, stream: &mut Stream<R>, first: Token) -> Result<()> {
        first.assert_delim(Delim::BeginObject)?;
        loop {
            let (name, more) = stream.read_string_or_end(End::Object)?;
            if !more {
                return Ok(());
            }
            match name.as_str() {
                "id" => self.id = stream.read_int()?,
                "name" => self.name = stream.read_string()?,
                "score" => self.score = stream.read_float()?,
                "tags" => {
                    stream.read_consumer(&mut self.tags)?;
                }
                _ => stream.skip_value()?,
            }
        }
    }
}

impl Consumer for Tag {
    fn consume<R: BufRead>(&mut self, _: &mut Stream<R>, first: Token) -> Result<()> {
        match first {
            Token::String(s) => {
                self.0 = s;
                Ok(())
            }
            token => Err(json_consumer::Error::custom(format!(
                "expected a tag, got {token}"
            ))),
        }
    }
}

impl Producer for Record {
    fn produce<W: Write>(&self, w: &mut W) -> Result<()> {
        write_byte(b'{', w)?;
        write_string("id", w)?;
        write_byte(b':', w)?;
        write_int(self.id, w)?;
        write_byte(b',', w)?;
        write_string("name", w)?;
        write_byte(b':', w)?;
        write_string(&self.name, w)?;
        write_byte(b',', w)?;
        write_string("score", w)?;
        write_byte(b':', w)?;
        write_float(self.score, w)?;
        write_byte(b',', w)?;
        write_string("tags", w)?;
        write_byte(b':', w)?;
        write_byte(b'[', w)?;
        for (i, tag) in self.tags.iter().enumerate() {
            if i > 0 {
                write_byte(b',', w)?;
            }
            write_string(&tag.0, w)?;
        }
        write_byte(b']', w)?;
        write_byte(b',', w)?;
        write_string("unknown", w)?;
        write_byte(b':', w)?;
        w.write_all(b"{\"nested\":[1,2,3,{\"deep\":null}]}")?;
        write_byte(b'}', w)
    }
}

fn records() -> Vec<Record> {
    (0..1000)
        .map(|i| Record {
            id: i,
            name: format!("record \"{i}\"\n"),
            score: i as f64 / 7.,
            tags: (0..i % 5).map(|t| Tag(format!("tag{t}"))).collect(),
        })
        .collect()
}

fn bench_unmarshal(c: &mut Criterion) {
    let data = marshal(&records()).unwrap();
    c.bench_function("unmarshal records", |b| {
        b.iter(|| {
            let mut decoded: Vec<Record> = Vec::new();
            unmarshal(&mut decoded, &data).unwrap();
            decoded
        })
    });
    c.bench_function("skip records", |b| {
        b.iter(|| unmarshal(&mut Skip, &data).unwrap())
    });
}

fn bench_marshal(c: &mut Criterion) {
    let records = records();
    c.bench_function("marshal records", |b| b.iter(|| marshal(&records).unwrap()));
}

criterion_group!(decode, bench_unmarshal, bench_marshal);

criterion_main!(decode);
