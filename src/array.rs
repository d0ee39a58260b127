//! Writing flat numeric arrays into inline `<DataArray>` elements

use crate::write_vtk::{self, Encoding};
use crate::Error;
use quick_xml::events::BytesText;
use quick_xml::events::Event;
use quick_xml::writer::Writer;
use std::io::Write;

/// The VTK type name of the elements of a `<DataArray>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Float32,
    Int64,
    UInt8,
}

impl Precision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Float32 => "Float32",
            Self::Int64 => "Int64",
            Self::UInt8 => "UInt8",
        }
    }
}

/// Element types that can be written to a vtk file
pub trait Numeric: Copy {
    /// size of a single element in bytes
    const SIZE: usize;

    fn as_precision() -> Precision;

    /// append the little endian representation of this value
    fn extend_le_bytes(&self, bytes: &mut Vec<u8>);

    /// append the ascii representation of this value (without a separator)
    fn push_ascii(&self, out: &mut String);
}

macro_rules! float_numeric {
    ($ty:ty, $precision:ident) => {
        impl Numeric for $ty {
            const SIZE: usize = std::mem::size_of::<$ty>();

            fn as_precision() -> Precision {
                Precision::$precision
            }

            fn extend_le_bytes(&self, bytes: &mut Vec<u8>) {
                bytes.extend_from_slice(&self.to_le_bytes())
            }

            fn push_ascii(&self, out: &mut String) {
                let mut buffer = ryu::Buffer::new();
                out.push_str(buffer.format(*self));
            }
        }
    };
}

macro_rules! int_numeric {
    ($ty:ty, $precision:ident) => {
        impl Numeric for $ty {
            const SIZE: usize = std::mem::size_of::<$ty>();

            fn as_precision() -> Precision {
                Precision::$precision
            }

            fn extend_le_bytes(&self, bytes: &mut Vec<u8>) {
                bytes.extend_from_slice(&self.to_le_bytes())
            }

            fn push_ascii(&self, out: &mut String) {
                out.push_str(&self.to_string());
            }
        }
    };
}

float_numeric!(f32, Float32);
int_numeric!(i64, Int64);
int_numeric!(u8, UInt8);

/// An array that can be written inline (ascii or base64) in a `<DataArray>` element
pub trait Array {
    fn write_ascii<W: Write>(
        &self,
        writer: &mut Writer<W>,
        name: Option<&str>,
        components: usize,
    ) -> Result<(), Error>;

    fn write_base64<W: Write>(
        &self,
        writer: &mut Writer<W>,
        name: Option<&str>,
        components: usize,
    ) -> Result<(), Error>;

    fn precision(&self) -> Precision;
}

impl<NUM> Array for [NUM]
where
    NUM: Numeric,
{
    fn write_ascii<W: Write>(
        &self,
        writer: &mut Writer<W>,
        name: Option<&str>,
        components: usize,
    ) -> Result<(), Error> {
        write_vtk::write_inline_array_header(
            writer,
            Encoding::Ascii,
            name,
            components,
            self.precision(),
        )?;

        let mut data = String::with_capacity(self.len() * 8);
        for value in self {
            value.push_ascii(&mut data);
            data.push(' ');
        }

        writer.write_event(Event::Text(BytesText::new(data.trim_end())))?;

        write_vtk::close_inline_array_header(writer)?;

        Ok(())
    }

    fn write_base64<W: Write>(
        &self,
        writer: &mut Writer<W>,
        name: Option<&str>,
        components: usize,
    ) -> Result<(), Error> {
        write_vtk::write_inline_array_header(
            writer,
            Encoding::Base64,
            name,
            components,
            self.precision(),
        )?;

        let payload = self.len() * NUM::SIZE;
        let mut byte_data: Vec<u8> = Vec::with_capacity(payload + 8);

        // uncompressed inline binary is prefixed with the payload size
        // in the `header_type` of the file (UInt64)
        byte_data.extend_from_slice(&(payload as u64).to_le_bytes());

        self.iter()
            .for_each(|value| value.extend_le_bytes(&mut byte_data));

        let data = base64::encode(byte_data.as_slice());

        writer.write_event(Event::Text(BytesText::new(&data)))?;

        write_vtk::close_inline_array_header(writer)?;

        Ok(())
    }

    fn precision(&self) -> Precision {
        NUM::as_precision()
    }
}
