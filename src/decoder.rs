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

//! SBF decoder.

use std::io::Read;

use log::debug;

use crate::{
    error::{EosContext, InvalidCodeContext, ReadError},
    header::{FileHeader, ShaderDescription, Struct, SIZE_FILE_HEADER, SIZE_SHADER_DESCRIPTION},
    library::{ShaderBinary, ShaderLibrary},
    options::OpenOptions,
    Lang,
    Stage
};

fn get_stage_from_code(code: u16) -> Result<Stage, ReadError> {
    match code {
        0x1 => Ok(Stage::Vertex),
        0x2 => Ok(Stage::Fragment),
        0x4 => Ok(Stage::Geometry),
        0x8 => Ok(Stage::Compute),
        0x10 => Ok(Stage::Mesh),
        0x20 => Ok(Stage::Task),
        0x40 => Ok(Stage::RayGen),
        0x80 => Ok(Stage::ClosestHit),
        0x100 => Ok(Stage::Miss),
        0x200 => Ok(Stage::AnyHit),
        0x400 => Ok(Stage::Intersect),
        0x800 => Ok(Stage::Callable),
        _ => Err(ReadError::InvalidCode(InvalidCodeContext::Stage, code))
    }
}

fn get_lang_from_code(code: u8) -> Result<Lang, ReadError> {
    match code {
        0x1 => Ok(Lang::Glsl),
        0x2 => Ok(Lang::Hlsl),
        0x4 => Ok(Lang::Slang),
        0x8 => Ok(Lang::Spirv),
        0x10 => Ok(Lang::Msl),
        0x20 => Ok(Lang::Air),
        _ => Err(ReadError::InvalidCode(InvalidCodeContext::Lang, code as u16))
    }
}

fn read_block<T: Read>(
    reader: &mut T,
    len: u64,
    context: EosContext
) -> Result<Vec<u8>, ReadError> {
    //Grow the buffer as data arrives instead of trusting the length stored in the file
    let mut buf = Vec::new();
    reader.by_ref().take(len).read_to_end(&mut buf)?;
    if buf.len() as u64 != len {
        return Err(ReadError::Eos(context));
    }
    Ok(buf)
}

fn read_string<T: Read>(
    reader: &mut T,
    len: u64,
    context: EosContext
) -> Result<String, ReadError> {
    let buf = read_block(reader, len, context)?;
    String::from_utf8(buf).map_err(|_| ReadError::Utf8(context))
}

fn read_descriptions<T: Read>(
    reader: &mut T,
    count: u16
) -> Result<Vec<ShaderDescription>, ReadError> {
    let mut descriptions = Vec::with_capacity(count as _);
    for _ in 0..count {
        descriptions.push(ShaderDescription::read(&mut *reader)?);
    }
    Ok(descriptions)
}

/// Reads an SBF and builds the corresponding [ShaderLibrary](crate::ShaderLibrary).
///
/// The data region is consumed linearly, in the order of the shader descriptions.
///
/// # Arguments
///
/// * `options`: the IO backend and decoder options.
///
/// returns: Result<ShaderLibrary, ReadError>
///
/// # Errors
///
/// Returns a [ReadError](crate::error::ReadError) if the SBF is truncated or corrupted.
///
/// # Examples
///
/// ```
/// use sbf::decoder::read_shader_library;
/// use sbf::error::ReadError;
///
/// let err = read_shader_library(&b"!SB"[..]).unwrap_err();
/// assert!(matches!(err, ReadError::Truncated(3)));
/// ```
pub fn read_shader_library<T: Read>(
    options: impl Into<OpenOptions<T>>
) -> Result<ShaderLibrary, ReadError> {
    let options: OpenOptions<T> = options.into();
    let OpenOptions {
        mut backend,
        check_bounds,
        max_payload_size
    } = options;
    let header = FileHeader::read(&mut backend)?;
    let descriptions = read_descriptions(&mut backend, header.shader_count)?;
    let mut cursor = (SIZE_FILE_HEADER + SIZE_SHADER_DESCRIPTION * descriptions.len()) as u64;
    let mut binaries = Vec::with_capacity(descriptions.len());
    for (index, desc) in descriptions.iter().enumerate() {
        if check_bounds && desc.name_offset != cursor {
            return Err(ReadError::Offset {
                index,
                expected: cursor,
                actual: desc.name_offset
            });
        }
        let name_len = desc.name_len().ok_or(ReadError::OffsetOrder(index))?;
        let shader_name_len = desc.shader_name_len().ok_or(ReadError::OffsetOrder(index))?;
        if desc.byte_size > max_payload_size {
            return Err(ReadError::PayloadSize {
                index,
                size: desc.byte_size,
                max: max_payload_size
            });
        }
        let stage = get_stage_from_code(desc.stage)?;
        let lang = get_lang_from_code(desc.lang)?;
        let name = read_string(&mut backend, name_len, EosContext::EntryName)?;
        let shader_name = read_string(&mut backend, shader_name_len, EosContext::ShaderName)?;
        let data = read_block(&mut backend, desc.byte_size, EosContext::Payload)?;
        debug!(
            "Read shader #{} {}::{} ({} stage, {}): Size = {}",
            index,
            shader_name,
            name,
            stage.name(),
            lang.name(),
            data.len()
        );
        cursor += name_len + shader_name_len + desc.byte_size;
        binaries.push(ShaderBinary {
            stage,
            lang,
            name,
            shader_name,
            data
        });
    }
    Ok(ShaderLibrary::from_binaries(binaries))
}
