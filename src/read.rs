use byteorder::{ByteOrder, NativeEndian, ReadBytesExt};
use common::vec2::Vec2;
use std::fs::File;
use std::io::{BufRead, BufReader, Error, ErrorKind, Read};
use std::path::Path;

fn invalid(message: String) -> Error {
    Error::new(ErrorKind::InvalidData, message)
}

/// One object per non-empty line; the first column is an object id and is skipped.
fn read_text<R: BufRead>(reader: R, limit: Option<usize>) -> std::io::Result<Vec2<f32>> {
    let mut dims = None;
    let mut base = Vec::new();
    let mut count = 0usize;
    for (number, line) in reader.lines().enumerate() {
        if limit.is_some_and(|limit| count >= limit) {
            break;
        }
        let line = line?;
        let mut fields = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty());
        if fields.next().is_none() {
            continue;
        }
        let before = base.len();
        for field in fields {
            let x = field.parse::<f32>().map_err(|e| {
                invalid(format!("line {}: bad coordinate `{field}`: {e}", number + 1))
            })?;
            base.push(x);
        }
        let width = base.len() - before;
        match dims {
            None if width == 0 => {
                return Err(invalid(format!("line {}: no coordinates", number + 1)));
            }
            None => dims = Some(width),
            Some(dims) if dims != width => {
                return Err(invalid(format!(
                    "line {}: found {width} coordinates, expected {dims}",
                    number + 1
                )));
            }
            Some(_) => (),
        }
        count += 1;
    }
    let dims = dims.ok_or_else(|| invalid("no objects found".to_string()))?;
    Ok(Vec2::from_vec((count, dims), base))
}

/// Native-endian `i32` object count, `i32` coordinate count, then row-major `f32`s.
fn read_binary<R: Read>(mut reader: R, limit: Option<usize>) -> std::io::Result<Vec2<f32>> {
    let n = reader.read_i32::<NativeEndian>()?;
    let dims = reader.read_i32::<NativeEndian>()?;
    if n <= 0 || dims <= 0 {
        return Err(invalid(format!("bad header: {n} objects of {dims} coordinates")));
    }
    let n = match limit {
        Some(limit) => std::cmp::min(n as usize, limit),
        None => n as usize,
    };
    let dims = dims as usize;
    let len = n
        .checked_mul(dims)
        .filter(|len| len.checked_mul(4).is_some())
        .ok_or_else(|| invalid(format!("bad header: {n} objects of {dims} coordinates")))?;
    // the payload must be present before the header's size is trusted
    let mut bytes = Vec::new();
    reader.take(len as u64 * 4).read_to_end(&mut bytes)?;
    if bytes.len() != len * 4 {
        return Err(Error::new(
            ErrorKind::UnexpectedEof,
            format!("found {} bytes of coordinates, expected {}", bytes.len(), len * 4),
        ));
    }
    let mut base = Vec::new();
    base.try_reserve_exact(len)
        .map_err(|e| invalid(format!("cannot hold {len} coordinates: {e}")))?;
    base.resize(len, 0.0f32);
    NativeEndian::read_f32_into(&bytes, &mut base);
    Ok(Vec2::from_vec((n, dims), base))
}

pub fn read_objects(path: &Path, binary: bool) -> std::io::Result<Vec2<f32>> {
    let reader = BufReader::new(File::open(path)?);
    if binary {
        read_binary(reader, None)
    } else {
        read_text(reader, None)
    }
}

/// Reads the first `n` objects of `path`, which must have `dims` coordinates each.
pub fn read_n_objects(
    path: &Path,
    binary: bool,
    n: usize,
    dims: usize,
) -> std::io::Result<Vec2<f32>> {
    let reader = BufReader::new(File::open(path)?);
    let objects = if binary {
        read_binary(reader, Some(n))?
    } else {
        read_text(reader, Some(n))?
    };
    if objects.shape_0() < n {
        return Err(invalid(format!(
            "found {} objects, expected at least {n}",
            objects.shape_0()
        )));
    }
    if objects.shape_1() != dims {
        return Err(invalid(format!(
            "found {} coordinates, expected {dims}",
            objects.shape_1()
        )));
    }
    Ok(objects)
}

#[cfg(test)]
mod test {
    use super::*;
    use byteorder::WriteBytesExt;
    use std::io::Cursor;

    #[test]
    fn text() {
        let data = "0 1.0 2.0\n1 3.5 -4\n\n2,5e1,6\n";
        let objects = read_text(Cursor::new(data), None).unwrap();
        assert_eq!(objects.shape_0(), 3);
        assert_eq!(objects.shape_1(), 2);
        assert_eq!(objects.as_slice(), &[1.0, 2.0, 3.5, -4.0, 50.0, 6.0]);
        let objects = read_text(Cursor::new(data), Some(2)).unwrap();
        assert_eq!(objects.as_slice(), &[1.0, 2.0, 3.5, -4.0]);
    }

    #[test]
    fn text_errors() {
        let err = read_text(Cursor::new("0 1 2\n1 3\n"), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(read_text(Cursor::new("0 1 x\n"), None).is_err());
        assert!(read_text(Cursor::new("0\n"), None).is_err());
        assert!(read_text(Cursor::new("\n\n"), None).is_err());
    }

    fn binary(n: i32, dims: i32, values: &[f32]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.write_i32::<NativeEndian>(n).unwrap();
        bytes.write_i32::<NativeEndian>(dims).unwrap();
        for &x in values {
            bytes.write_f32::<NativeEndian>(x).unwrap();
        }
        bytes
    }

    #[test]
    fn binary_layout() {
        let bytes = binary(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let objects = read_binary(Cursor::new(&bytes), None).unwrap();
        assert_eq!(objects.shape_0(), 3);
        assert_eq!(&objects[(2,)], &[5.0, 6.0]);
        let objects = read_binary(Cursor::new(&bytes), Some(1)).unwrap();
        assert_eq!(objects.as_slice(), &[1.0, 2.0]);
    }

    #[test]
    fn binary_errors() {
        let truncated = binary(3, 2, &[1.0, 2.0]);
        assert_eq!(
            read_binary(Cursor::new(&truncated), None).unwrap_err().kind(),
            ErrorKind::UnexpectedEof
        );
        let empty = binary(0, 2, &[]);
        assert_eq!(
            read_binary(Cursor::new(&empty), None).unwrap_err().kind(),
            ErrorKind::InvalidData
        );
    }

    #[test]
    fn oversized_header_is_an_error() {
        let huge = binary(i32::MAX, i32::MAX, &[1.0, 2.0]);
        assert!(matches!(
            read_binary(Cursor::new(&huge), None).unwrap_err().kind(),
            ErrorKind::UnexpectedEof | ErrorKind::InvalidData
        ));
        let huge = binary(i32::MAX, 4, &[]);
        assert_eq!(
            read_binary(Cursor::new(&huge), None).unwrap_err().kind(),
            ErrorKind::UnexpectedEof
        );
    }
}
