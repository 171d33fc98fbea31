use crate::error::{Error, Result};
use std::io::Write;

/// A value that writes its own JSON representation.
///
/// ```
/// use json_consumer::{marshal, write_byte, write_int, write_string, Producer, Result};
/// use std::io::Write;
///
/// struct Point {
///     x: i64,
/// }
///
/// impl Producer for Point {
///     fn produce<W: Write>(&self, w: &mut W) -> Result<()> {
///         write_byte(b'{', w)?;
///         write_string("x", w)?;
///         write_byte(b':', w)?;
///         write_int(self.x, w)?;
///         write_byte(b'}', w)
///     }
/// }
///
/// assert_eq!(marshal(&Point { x: 3 })?, b"{\"x\":3}");
/// # Result::Ok(())
/// ```
pub trait Producer {
    fn produce<W: Write>(&self, w: &mut W) -> Result<()>;
}

/// Writes a JSON array.
impl<T: Producer> Producer for [T] {
    fn produce<W: Write>(&self, w: &mut W) -> Result<()> {
        write_byte(b'[', w)?;
        for (i, element) in self.iter().enumerate() {
            if i > 0 {
                write_byte(b',', w)?;
            }
            element.produce(w)?;
        }
        write_byte(b']', w)
    }
}

impl<T: Producer> Producer for Vec<T> {
    fn produce<W: Write>(&self, w: &mut W) -> Result<()> {
        self.as_slice().produce(w)
    }
}

/// Writes `null` for `None`.
impl<T: Producer> Producer for Option<T> {
    fn produce<W: Write>(&self, w: &mut W) -> Result<()> {
        match self {
            Some(value) => value.produce(w),
            None => write_null(w),
        }
    }
}

pub fn marshal<P: Producer + ?Sized>(producer: &P) -> Result<Vec<u8>> {
    marshal_to_writer(producer, Vec::new())
}

/// Writes `producer` to `writer`, flushes it and returns it.
pub fn marshal_to_writer<P: Producer + ?Sized, W: Write>(producer: &P, mut writer: W) -> Result<W> {
    let result = producer.produce(&mut writer).and_then(|()| Ok(writer.flush()?));
    if let Err(e) = &result {
        log::debug!("Failed to encode {}: {e}", std::any::type_name::<P>());
    }
    result.map(|()| writer)
}

/// Writes `s` as a quoted JSON string, escaping quotes, backslashes and control characters.
pub fn write_string(s: &str, w: &mut impl Write) -> Result<()> {
    w.write_all(b"\"")?;
    let mut start = 0;
    for (i, c) in s.bytes().enumerate() {
        let escaped: &[u8] = match c {
            b'"' => b"\\\"",
            b'\\' => b"\\\\",
            b'\n' => b"\\n",
            b'\r' => b"\\r",
            b'\t' => b"\\t",
            0x08 => b"\\b",
            0x0C => b"\\f",
            0..=0x1F => {
                w.write_all(&s.as_bytes()[start..i])?;
                write!(w, "\\u{c:04X}")?;
                start = i + 1;
                continue;
            }
            _ => continue,
        };
        w.write_all(&s.as_bytes()[start..i])?;
        w.write_all(escaped)?;
        start = i + 1;
    }
    w.write_all(&s.as_bytes()[start..])?;
    w.write_all(b"\"")?;
    Ok(())
}

/// Writes a single structural byte such as `{` or `:`.
pub fn write_byte(b: u8, w: &mut impl Write) -> Result<()> {
    Ok(w.write_all(&[b])?)
}

pub fn write_int(i: i64, w: &mut impl Write) -> Result<()> {
    Ok(write!(w, "{i}")?)
}

pub fn write_uint(i: u64, w: &mut impl Write) -> Result<()> {
    Ok(write!(w, "{i}")?)
}

/// Writes a finite float. NaN and infinities have no JSON representation and are rejected.
pub fn write_float(f: f64, w: &mut impl Write) -> Result<()> {
    if !f.is_finite() {
        return Err(Error::malformed(format_args!(
            "{f} cannot be represented in JSON"
        )));
    }
    Ok(write!(w, "{f}")?)
}

pub fn write_bool(b: bool, w: &mut impl Write) -> Result<()> {
    Ok(w.write_all(if b { b"true" } else { b"false" })?)
}

pub fn write_null(w: &mut impl Write) -> Result<()> {
    Ok(w.write_all(b"null")?)
}
