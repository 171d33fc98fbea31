#![no_main]

use json_consumer::{
    marshal, write_bool, write_byte, write_float, write_int, write_string, Consumer, Decoder,
    Delim, End, Error, Producer, Result, Stream, Token,
};
use libfuzzer_sys::fuzz_target;
use std::io::{BufRead, Write};

#[derive(Default, Debug, PartialEq)]
struct Doc {
    name: String,
    count: i64,
    ratio: f64,
    flags: Vec<Flag>,
    children: Vec<Doc>,
}

#[derive(Default, Debug, PartialEq)]
struct Flag(bool);

impl Consumer for Doc {
    fn consume<R: BufRead>(&mut self, stream: &mut Stream<R>, first: Token) -> Result<()> {
        first.assert_delim(Delim::BeginObject)?;
        loop {
            let (name, more) = stream.read_string_or_end(End::Object)?;
            if !more {
                return Ok(());
            }
            match name.as_str() {
                "name" => self.name = stream.read_string()?,
                "count" => self.count = stream.read_int()?,
                "ratio" => self.ratio = stream.read_float()?,
                "flags" => {
                    stream.read_consumer(&mut self.flags)?;
                }
                "children" => {
                    stream.read_consumer(&mut self.children)?;
                }
                _ => stream.skip_value()?,
            }
        }
    }
}

impl Consumer for Flag {
    fn consume<R: BufRead>(&mut self, _: &mut Stream<R>, first: Token) -> Result<()> {
        match first {
            Token::Bool(b) => {
                self.0 = b;
                Ok(())
            }
            token => Err(Error::custom(format!("expected a flag, got {token}"))),
        }
    }
}

impl Producer for Flag {
    fn produce<W: Write>(&self, w: &mut W) -> Result<()> {
        write_bool(self.0, w)
    }
}

impl Producer for Doc {
    fn produce<W: Write>(&self, w: &mut W) -> Result<()> {
        write_byte(b'{', w)?;
        write_string("name", w)?;
        write_byte(b':', w)?;
        write_string(&self.name, w)?;
        write_byte(b',', w)?;
        write_string("count", w)?;
        write_byte(b':', w)?;
        write_int(self.count, w)?;
        write_byte(b',', w)?;
        write_string("ratio", w)?;
        write_byte(b':', w)?;
        write_float(self.ratio, w)?;
        write_byte(b',', w)?;
        write_string("flags", w)?;
        write_byte(b':', w)?;
        self.flags.produce(w)?;
        write_byte(b',', w)?;
        write_string("children", w)?;
        write_byte(b':', w)?;
        self.children.produce(w)?;
        write_byte(b'}', w)
    }
}

fuzz_target!(|data: &[u8]| {
    let mut decoder = Decoder::new();
    decoder.max_nesting(64);
    let mut doc = Doc::default();
    if decoder.unmarshal(&mut doc, data).is_err() {
        return;
    }
    let serialization = marshal(&doc).unwrap();
    let mut again = Doc::default();
    decoder
        .unmarshal(&mut again, &serialization)
        .unwrap_or_else(|e| {
            panic!(
                "Failed to decode '{}' with error {e}",
                String::from_utf8_lossy(&serialization)
            )
        });
    assert_eq!(doc, again);
});
