// Copyright (c) 2023, BlockProject 3D
//
// All rights reserved.
//
// Redistribution and use in source and binary forms, with or without modification,
// are permitted provided that the following conditions are met:
//
//     * Redistributions of source code must retain the above copyright notice,
//       this list of conditions and the following disclaimer.
//     * Redistributions in binary form must reproduce the above copyright notice,
//       this list of conditions and the following disclaimer in the documentation
//       and/or other materials provided with the distribution.
//     * Neither the name of BlockProject 3D nor the names of its contributors
//       may be used to endorse or promote products derived from this software
//       without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS
// "AS IS" AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT
// LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR
// A PARTICULAR PURPOSE ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT OWNER OR
// CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL,
// EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO,
// PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR
// PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF
// LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING
// NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE OF THIS
// SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! Declarations for basic constants and low-level file headers.

use std::io;

use byteorder::{ByteOrder, LittleEndian};
use bytesutil::ReadFill;

use crate::error::{EosContext, ReadError};

/// Represents a serializable and deserializable byte structure in an SBF.
pub trait Struct<const S: usize>: Sized {
    /// The type of error to return if this structure failed to read.
    ///
    /// *Must be constructable from io::Error to satisfy the Read function*
    type Error: From<io::Error>;

    /// Creates a new empty structure.
    fn new() -> Self;

    /// Attempts to read a structure from an IO backend.
    ///
    /// # Arguments
    ///
    /// * `reader`: the IO backend to read from.
    ///
    /// returns: Result<Self, Self::Error>
    ///
    /// # Errors
    ///
    /// Returns an error if the data could not be read from the IO backend or if
    /// the structure is corrupted.
    ///
    /// # Examples
    ///
    /// ```should_panic
    /// use sbf::header::{FileHeader, SIZE_FILE_HEADER, Struct};
    ///
    /// let corrupted: [u8; SIZE_FILE_HEADER] = [0; SIZE_FILE_HEADER];
    /// FileHeader::read(&corrupted[..]).unwrap();
    /// ```
    fn read<TReader: io::Read>(mut reader: TReader) -> Result<Self, Self::Error> {
        let mut buffer: [u8; S] = [0; S];
        let len = reader.read_fill(&mut buffer)?;
        if len != S {
            return Err(Self::error_buffer_size(len));
        }
        Self::from_bytes(buffer)
    }

    /// Returns the error to return when the reader did not read a full buffer.
    ///
    /// # Arguments
    ///
    /// * `len`: the number of bytes which could be read.
    fn error_buffer_size(len: usize) -> Self::Error;

    /// Attempts to read a structure from a fixed size byte array.
    ///
    /// # Arguments
    ///
    /// * `buffer`: the fixed size byte array to read from.
    ///
    /// returns: Result<Self, Self::Error>
    fn from_bytes(buffer: [u8; S]) -> Result<Self, Self::Error>;

    /// Converts this structure to a fixed size byte array.
    fn to_bytes(&self) -> [u8; S];

    /// Attempts to write this structure to an IO backend.
    ///
    /// # Arguments
    ///
    /// * `writer`: the IO backend to write to.
    ///
    /// returns: Result<(), std::io::Error>
    ///
    /// # Errors
    ///
    /// Returns an [Error](std::io::Error) if the data could not be
    /// written to the IO backend.
    fn write<TWriter: io::Write>(&self, writer: &mut TWriter) -> io::Result<()> {
        let buf = self.to_bytes();
        writer.write_all(&buf)?;
        Ok(())
    }
}

/// Packs four ASCII characters into a little-endian 32 bits code.
///
/// # Examples
///
/// ```
/// use sbf::header::{four_character_code, MAGIC};
///
/// assert_eq!(four_character_code(b'!', b'S', b'B', b'F'), MAGIC);
/// assert_eq!(MAGIC.to_le_bytes(), *b"!SBF");
/// ```
pub const fn four_character_code(c1: u8, c2: u8, c3: u8, c4: u8) -> u32 {
    (c1 as u32) | ((c2 as u32) << 8) | ((c3 as u32) << 16) | ((c4 as u32) << 24)
}

/// The magic constant identifying an SBF.
pub const MAGIC: u32 = four_character_code(b'!', b'S', b'B', b'F');

/// The size in bytes of the SBF file header (including padding).
pub const SIZE_FILE_HEADER: usize = 8;

/// The size in bytes of an SBF shader description (including padding).
pub const SIZE_SHADER_DESCRIPTION: usize = 40;

/// The maximum number of shaders in a single SBF.
pub const MAX_SHADER_COUNT: usize = u16::MAX as usize;

/// The SBF file header.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct FileHeader {
    /// Magic constant (see [MAGIC](MAGIC)).
    ///
    /// Offset: +0
    pub magic: u32,

    /// Number of shader descriptions following this header.
    ///
    /// Offset: +4
    pub shader_count: u16
}

impl Struct<SIZE_FILE_HEADER> for FileHeader {
    type Error = ReadError;

    fn new() -> Self {
        FileHeader {
            magic: MAGIC,    //+0
            shader_count: 0  //+4
        }
    }

    fn error_buffer_size(len: usize) -> Self::Error {
        ReadError::Truncated(len)
    }

    fn from_bytes(buffer: [u8; SIZE_FILE_HEADER]) -> Result<Self, Self::Error> {
        let head = FileHeader {
            magic: LittleEndian::read_u32(&buffer[0..4]),
            shader_count: LittleEndian::read_u16(&buffer[4..6])
        };
        if head.magic != MAGIC {
            return Err(ReadError::BadMagic {
                found: head.magic,
                expected: MAGIC
            });
        }
        Ok(head)
    }

    fn to_bytes(&self) -> [u8; SIZE_FILE_HEADER] {
        let mut block: [u8; SIZE_FILE_HEADER] = [0; SIZE_FILE_HEADER];
        LittleEndian::write_u32(&mut block[0..4], self.magic);
        LittleEndian::write_u16(&mut block[4..6], self.shader_count);
        block
    }
}

/// An SBF shader description.
///
/// Offsets are absolute positions in the file. The lengths of the names are not stored: the
/// entry point name ends where the shader name starts and the shader name ends where the payload
/// starts.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ShaderDescription {
    /// Offset of the shader payload.
    ///
    /// Offset: +0
    pub byte_offset: u64,

    /// Size in bytes of the shader payload.
    ///
    /// Offset: +8
    pub byte_size: u64,

    /// Offset of the entry point name.
    ///
    /// Offset: +16
    pub name_offset: u64,

    /// Offset of the shader name.
    ///
    /// Offset: +24
    pub shader_name_offset: u64,

    /// Stage code (a single bit).
    ///
    /// Offset: +32
    pub stage: u16,

    /// Language code (a single bit).
    ///
    /// Offset: +34
    pub lang: u8
}

impl ShaderDescription {
    /// Returns the length of the entry point name or None if the offsets are not ordered.
    pub fn name_len(&self) -> Option<u64> {
        self.shader_name_offset.checked_sub(self.name_offset)
    }

    /// Returns the length of the shader name or None if the offsets are not ordered.
    pub fn shader_name_len(&self) -> Option<u64> {
        self.byte_offset.checked_sub(self.shader_name_offset)
    }
}

impl Struct<SIZE_SHADER_DESCRIPTION> for ShaderDescription {
    type Error = ReadError;

    fn new() -> Self {
        ShaderDescription {
            byte_offset: 0,        //+0
            byte_size: 0,          //+8
            name_offset: 0,        //+16
            shader_name_offset: 0, //+24
            stage: 0,              //+32
            lang: 0                //+34
        }
    }

    fn error_buffer_size(_: usize) -> Self::Error {
        ReadError::Eos(EosContext::Description)
    }

    fn from_bytes(buffer: [u8; SIZE_SHADER_DESCRIPTION]) -> Result<Self, Self::Error> {
        Ok(ShaderDescription {
            byte_offset: LittleEndian::read_u64(&buffer[0..8]),
            byte_size: LittleEndian::read_u64(&buffer[8..16]),
            name_offset: LittleEndian::read_u64(&buffer[16..24]),
            shader_name_offset: LittleEndian::read_u64(&buffer[24..32]),
            stage: LittleEndian::read_u16(&buffer[32..34]),
            lang: buffer[34]
        })
    }

    fn to_bytes(&self) -> [u8; SIZE_SHADER_DESCRIPTION] {
        let mut block: [u8; SIZE_SHADER_DESCRIPTION] = [0; SIZE_SHADER_DESCRIPTION];
        LittleEndian::write_u64(&mut block[0..8], self.byte_offset);
        LittleEndian::write_u64(&mut block[8..16], self.byte_size);
        LittleEndian::write_u64(&mut block[16..24], self.name_offset);
        LittleEndian::write_u64(&mut block[24..32], self.shader_name_offset);
        LittleEndian::write_u16(&mut block[32..34], self.stage);
        block[34] = self.lang;
        block
    }
}
