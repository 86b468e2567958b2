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

//! SBF encoder.

use std::io::Write;

use log::debug;

use crate::{
    error::WriteError,
    header::{
        FileHeader,
        ShaderDescription,
        Struct,
        MAGIC,
        MAX_SHADER_COUNT,
        SIZE_FILE_HEADER,
        SIZE_SHADER_DESCRIPTION
    },
    Lang,
    ShaderInput,
    Stage
};

pub(crate) fn get_stage_code(stage: Stage) -> u16 {
    match stage {
        Stage::Vertex => 1 << 0,
        Stage::Fragment => 1 << 1,
        Stage::Geometry => 1 << 2,
        Stage::Compute => 1 << 3,
        Stage::Mesh => 1 << 4,
        Stage::Task => 1 << 5,
        Stage::RayGen => 1 << 6,
        Stage::ClosestHit => 1 << 7,
        Stage::Miss => 1 << 8,
        Stage::AnyHit => 1 << 9,
        Stage::Intersect => 1 << 10,
        Stage::Callable => 1 << 11
    }
}

pub(crate) fn get_lang_code(lang: Lang) -> u8 {
    match lang {
        Lang::Glsl => 1 << 0,
        Lang::Hlsl => 1 << 1,
        Lang::Slang => 1 << 2,
        Lang::Spirv => 1 << 3,
        Lang::Msl => 1 << 4,
        Lang::Air => 1 << 5
    }
}

fn check_inputs(inputs: &[ShaderInput]) -> Result<(), WriteError> {
    if inputs.len() > MAX_SHADER_COUNT {
        return Err(WriteError::Capacity(inputs.len()));
    }
    for (index, input) in inputs.iter().enumerate() {
        if !input.lang.is_binary() {
            return Err(WriteError::TextualLang {
                index,
                lang: input.lang
            });
        }
    }
    Ok(())
}

fn put(output: &mut [u8], cursor: &mut usize, bytes: &[u8]) {
    output[*cursor..*cursor + bytes.len()].copy_from_slice(bytes);
    *cursor += bytes.len();
}

/// Builds an SBF from a list of compiled shaders.
///
/// The shaders are stored in the same order as `inputs`; this function does no IO.
///
/// # Arguments
///
/// * `inputs`: the shaders to store.
///
/// returns: Result<Vec<u8>, WriteError>
///
/// # Errors
///
/// Returns a [WriteError](crate::error::WriteError) if there are more than 65535 inputs or if
/// one of them is tagged with a textual language.
///
/// # Examples
///
/// ```
/// use sbf::encoder::build_shader_library;
/// use sbf::header::SIZE_FILE_HEADER;
///
/// let bytes = build_shader_library(&[]).unwrap();
/// assert_eq!(bytes.len(), SIZE_FILE_HEADER);
/// assert_eq!(&bytes[0..4], b"!SBF");
/// ```
pub fn build_shader_library(inputs: &[ShaderInput]) -> Result<Vec<u8>, WriteError> {
    check_inputs(inputs)?;
    let table_size = SIZE_FILE_HEADER + SIZE_SHADER_DESCRIPTION * inputs.len();
    let data_size: usize = inputs
        .iter()
        .map(|v| v.name.len() + v.shader_name.len() + v.data.len())
        .sum();
    let mut output = vec![0; table_size + data_size];
    let mut cursor = 0;

    let header = FileHeader {
        magic: MAGIC,
        shader_count: inputs.len() as u16
    };
    put(&mut output, &mut cursor, &header.to_bytes());

    //Descriptions point at the data blocks in the same order as they are written below
    let mut data_offset = table_size as u64;
    for input in inputs {
        let name_offset = data_offset;
        let shader_name_offset = name_offset + input.name.len() as u64;
        let desc = ShaderDescription {
            byte_offset: shader_name_offset + input.shader_name.len() as u64,
            byte_size: input.data.len() as u64,
            name_offset,
            shader_name_offset,
            stage: get_stage_code(input.stage),
            lang: get_lang_code(input.lang)
        };
        debug!(
            "Writing shader {}::{} ({} stage, {}): Offset = {}, Size = {}",
            input.shader_name,
            input.name,
            input.stage.name(),
            input.lang.name(),
            desc.byte_offset,
            desc.byte_size
        );
        put(&mut output, &mut cursor, &desc.to_bytes());
        data_offset = desc.byte_offset + desc.byte_size;
    }

    for input in inputs {
        put(&mut output, &mut cursor, input.name.as_bytes());
        put(&mut output, &mut cursor, input.shader_name.as_bytes());
        put(&mut output, &mut cursor, &input.data);
    }
    Ok(output)
}

/// Builds an SBF and writes it to an IO backend.
///
/// # Arguments
///
/// * `writer`: the IO backend to write to.
/// * `inputs`: the shaders to store.
///
/// returns: Result<(), WriteError>
///
/// # Errors
///
/// Returns a [WriteError](crate::error::WriteError) if the SBF could not be built or written.
pub fn write_shader_library<W: Write>(
    writer: &mut W,
    inputs: &[ShaderInput]
) -> Result<(), WriteError> {
    let bytes = build_shader_library(inputs)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Utility to collect shaders before building an SBF.
///
/// # Examples
///
/// ```
/// use sbf::encoder::ShaderLibraryBuilder;
/// use sbf::{Lang, ShaderInput, ShaderLibrary, Stage};
///
/// let mut builder = ShaderLibraryBuilder::new();
/// builder.add(ShaderInput {
///     data: vec![1, 2, 3, 4],
///     shader_name: "blur".into(),
///     name: "main".into(),
///     stage: Stage::Compute,
///     lang: Lang::Spirv
/// }).unwrap();
/// let bytes = builder.build().unwrap();
/// let library = ShaderLibrary::read(bytes.as_slice()).unwrap();
/// assert_eq!(library.shader_names(), ["blur"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ShaderLibraryBuilder {
    inputs: Vec<ShaderInput>
}

impl ShaderLibraryBuilder {
    /// Creates a new empty builder.
    pub fn new() -> ShaderLibraryBuilder {
        ShaderLibraryBuilder { inputs: Vec::new() }
    }

    /// Adds a shader to this builder.
    ///
    /// # Arguments
    ///
    /// * `input`: the shader to add.
    ///
    /// returns: Result<(), WriteError>
    ///
    /// # Errors
    ///
    /// Returns a [WriteError](crate::error::WriteError) if the builder is already full or if
    /// the shader is tagged with a textual language.
    pub fn add(&mut self, input: ShaderInput) -> Result<(), WriteError> {
        if self.inputs.len() >= MAX_SHADER_COUNT {
            return Err(WriteError::Capacity(self.inputs.len() + 1));
        }
        if !input.lang.is_binary() {
            return Err(WriteError::TextualLang {
                index: self.inputs.len(),
                lang: input.lang
            });
        }
        self.inputs.push(input);
        Ok(())
    }

    /// Returns the number of shaders in this builder.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Returns true if this builder has no shaders.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Builds the SBF, see [build_shader_library](build_shader_library).
    pub fn build(&self) -> Result<Vec<u8>, WriteError> {
        build_shader_library(&self.inputs)
    }

    /// Builds the SBF and writes it to an IO backend, see
    /// [write_shader_library](write_shader_library).
    pub fn save<W: Write>(&self, writer: &mut W) -> Result<(), WriteError> {
        write_shader_library(writer, &self.inputs)
    }
}

impl From<Vec<ShaderInput>> for ShaderLibraryBuilder {
    fn from(inputs: Vec<ShaderInput>) -> Self {
        ShaderLibraryBuilder { inputs }
    }
}
