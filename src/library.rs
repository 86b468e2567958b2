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

//! The in-memory representation of a decoded SBF.

use std::{io::Read, path::Path, slice::Iter};

use log::error;

use crate::{
    decoder::read_shader_library,
    error::ReadError,
    options::OpenOptions,
    utils::RecoverableError,
    Lang,
    Stage
};

/// Represents a shader stored in an SBF.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ShaderBinary {
    /// The shader stage.
    pub stage: Stage,

    /// The payload language (SPIRV or AIR).
    pub lang: Lang,

    /// The name of the entry point.
    pub name: String,

    /// The name of the shader this binary was compiled from.
    pub shader_name: String,

    /// The shader payload.
    pub data: Vec<u8>
}

/// A decoded SBF.
///
/// A library owns a copy of every shader payload and does not depend on its source once loaded.
///
/// # Examples
///
/// ```
/// use sbf::encoder::build_shader_library;
/// use sbf::{Lang, ShaderInput, ShaderLibrary, Stage};
///
/// let input = |shader_name: &str, data: Vec<u8>| ShaderInput {
///     data,
///     shader_name: shader_name.into(),
///     name: "main".into(),
///     stage: Stage::Fragment,
///     lang: Lang::Spirv
/// };
/// let bytes = build_shader_library(&[input("a", vec![1]), input("b", vec![2])]).unwrap();
/// let library = ShaderLibrary::read(bytes.as_slice()).unwrap();
/// //Only the first shader of a given stage can be found by stage
/// assert_eq!(library.get_binary_by_stage(Stage::Fragment).unwrap().data, [1]);
/// assert_eq!(library.get_binary_by_name("b").unwrap().data, [2]);
/// assert!(library.get_binary_by_stage(Stage::Vertex).is_none());
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ShaderLibrary {
    name: Option<String>,
    shader_names: Vec<String>,
    binaries: Vec<ShaderBinary>
}

impl ShaderLibrary {
    pub(crate) fn from_binaries(binaries: Vec<ShaderBinary>) -> ShaderLibrary {
        let shader_names = binaries.iter().map(|v| v.shader_name.clone()).collect();
        ShaderLibrary {
            name: None,
            shader_names,
            binaries
        }
    }

    /// Reads an SBF.
    ///
    /// # Arguments
    ///
    /// * `options`: A [Read](std::io::Read) to use as backend or an
    ///   [OpenOptions](crate::options::OpenOptions).
    ///
    /// returns: Result<ShaderLibrary, RecoverableError<ShaderLibrary, ReadError>>
    ///
    /// # Errors
    ///
    /// A [ReadError](crate::error::ReadError) is returned if the SBF is truncated or corrupted.
    /// The error always carries an empty library as recovery value.
    pub fn read<T: Read>(
        options: impl Into<OpenOptions<T>>
    ) -> Result<ShaderLibrary, RecoverableError<ShaderLibrary, ReadError>> {
        read_shader_library(options).map_err(|e| RecoverableError::new(e, ShaderLibrary::default()))
    }

    /// Reads an SBF, logging any error and returning an empty library in that case.
    ///
    /// # Arguments
    ///
    /// * `options`: A [Read](std::io::Read) to use as backend or an
    ///   [OpenOptions](crate::options::OpenOptions).
    ///
    /// returns: ShaderLibrary
    pub fn load<T: Read>(options: impl Into<OpenOptions<T>>) -> ShaderLibrary {
        Self::read(options).unwrap_or_else(|e| {
            error!("Failed to read shader library: {}", e.error());
            e.unwrap_value()
        })
    }

    /// Reads an SBF from a file.
    ///
    /// The library is named after the file stem.
    ///
    /// # Arguments
    ///
    /// * `path`: the path to the SBF file.
    ///
    /// returns: Result<ShaderLibrary, RecoverableError<ShaderLibrary, ReadError>>
    ///
    /// # Errors
    ///
    /// A [ReadError](crate::error::ReadError) is returned if the file could not be read or if
    /// the SBF is truncated or corrupted. The error always carries an empty library as recovery
    /// value.
    pub fn open_file(
        path: impl AsRef<Path>
    ) -> Result<ShaderLibrary, RecoverableError<ShaderLibrary, ReadError>> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| RecoverableError::<_, ReadError>::new(e, ShaderLibrary::default()))?;
        let mut library = Self::read(bytes.as_slice())?;
        library.name = path.file_stem().map(|v| v.to_string_lossy().into_owned());
        Ok(library)
    }

    /// Reads an SBF from a file, logging any error and returning an empty library in that case.
    ///
    /// # Arguments
    ///
    /// * `path`: the path to the SBF file.
    ///
    /// returns: ShaderLibrary
    pub fn load_file(path: impl AsRef<Path>) -> ShaderLibrary {
        let path = path.as_ref();
        Self::open_file(path).unwrap_or_else(|e| {
            error!("Failed to read shader library {}: {}", path.display(), e.error());
            e.unwrap_value()
        })
    }

    /// Returns the name of this library if it was opened from a file.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the shader names of all binaries, in file order.
    pub fn shader_names(&self) -> &[String] {
        &self.shader_names
    }

    /// Returns all binaries, in file order.
    pub fn binaries(&self) -> &[ShaderBinary] {
        &self.binaries
    }

    /// Returns an iterator over all binaries, in file order.
    pub fn iter(&self) -> Iter<'_, ShaderBinary> {
        self.binaries.iter()
    }

    /// Returns the number of binaries in this library.
    pub fn len(&self) -> usize {
        self.binaries.len()
    }

    /// Returns true if this library has no binaries.
    pub fn is_empty(&self) -> bool {
        self.binaries.is_empty()
    }

    /// Finds the first binary compiled from the given shader.
    ///
    /// # Arguments
    ///
    /// * `shader_name`: the name of the shader to search for.
    ///
    /// returns: Option<&ShaderBinary>
    pub fn get_binary_by_name(&self, shader_name: &str) -> Option<&ShaderBinary> {
        self.binaries.iter().find(|v| v.shader_name == shader_name)
    }

    /// Finds the first binary of the given stage.
    ///
    /// **Other binaries with the same stage are never returned by this function.**
    ///
    /// # Arguments
    ///
    /// * `stage`: the stage to search for.
    ///
    /// returns: Option<&ShaderBinary>
    pub fn get_binary_by_stage(&self, stage: Stage) -> Option<&ShaderBinary> {
        self.binaries.iter().find(|v| v.stage == stage)
    }
}

impl<'a> IntoIterator for &'a ShaderLibrary {
    type Item = &'a ShaderBinary;
    type IntoIter = Iter<'a, ShaderBinary>;

    fn into_iter(self) -> Self::IntoIter {
        self.binaries.iter()
    }
}
