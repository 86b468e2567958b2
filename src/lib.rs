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

//! This library is the official implementation of the Shader Binary Format (SBF), a container
//! packing every compiled stage of a shader program into a single file.
//!
//! The container is made of a file header, a table of fixed size shader descriptions and a data
//! region holding, for each shader, its entry point name, its shader name and its payload.
//!
//! # Examples
//!
//! ```
//! use sbf::{encoder::build_shader_library, Lang, ShaderInput, ShaderLibrary, Stage};
//!
//! let bytes = build_shader_library(&[ShaderInput {
//!     data: vec![0xDE, 0xAD],
//!     shader_name: "tonemap".into(),
//!     name: "main".into(),
//!     stage: Stage::Fragment,
//!     lang: Lang::Spirv
//! }]).unwrap();
//! let library = ShaderLibrary::read(bytes.as_slice()).unwrap();
//! let binary = library.get_binary_by_name("tonemap").unwrap();
//! assert_eq!(binary.stage, Stage::Fragment);
//! assert_eq!(binary.data, [0xDE, 0xAD]);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod compile;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod header;
pub mod library;
mod macros;
pub mod manifest;
pub mod options;
pub mod pack;
pub mod utils;

pub use library::{ShaderBinary, ShaderLibrary};

/// Enum of all shader stages supported by SBF.
///
/// A shader payload always belongs to exactly one stage; each stage is encoded as a single bit.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Stage {
    /// Vertex shader stage.
    Vertex,

    /// Pixel/fragment shader stage.
    Fragment,

    /// Geometry shader stage.
    Geometry,

    /// Compute shader stage.
    Compute,

    /// Mesh shader stage.
    Mesh,

    /// Task/amplification shader stage.
    Task,

    /// Ray generation shader stage.
    RayGen,

    /// Ray closest hit shader stage.
    ClosestHit,

    /// Ray miss shader stage.
    Miss,

    /// Ray any hit shader stage.
    AnyHit,

    /// Ray intersection shader stage.
    Intersect,

    /// Callable shader stage.
    Callable
}

impl Stage {
    /// Returns the name of this stage.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Vertex => "vertex",
            Stage::Fragment => "fragment",
            Stage::Geometry => "geometry",
            Stage::Compute => "compute",
            Stage::Mesh => "mesh",
            Stage::Task => "task",
            Stage::RayGen => "ray generation",
            Stage::ClosestHit => "closest hit",
            Stage::Miss => "miss",
            Stage::AnyHit => "any hit",
            Stage::Intersect => "intersection",
            Stage::Callable => "callable"
        }
    }
}

/// Enum of all shader languages known to SBF.
///
/// Only [Spirv](Lang::Spirv) and [Air](Lang::Air) are binary representations which can be stored
/// in a container; the other languages are only valid as a compiler input.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Lang {
    /// OpenGL Shading Language.
    Glsl,

    /// High Level Shading Language.
    Hlsl,

    /// Slang shading language.
    Slang,

    /// SPIR-V binary.
    Spirv,

    /// Metal Shading Language (source text).
    Msl,

    /// Apple IR (compiled Metal library).
    Air
}

impl Lang {
    /// Returns the name of this language.
    pub fn name(&self) -> &'static str {
        match self {
            Lang::Glsl => "GLSL",
            Lang::Hlsl => "HLSL",
            Lang::Slang => "SLANG",
            Lang::Spirv => "SPIRV",
            Lang::Msl => "MSL",
            Lang::Air => "AIR"
        }
    }

    /// Returns true if this language can be stored as a shader payload.
    pub fn is_binary(&self) -> bool {
        matches!(self, Lang::Spirv | Lang::Air)
    }
}

/// Represents a compiled shader entry to be written in an SBF.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ShaderInput {
    /// The shader payload (SPIR-V words or Apple IR).
    pub data: Vec<u8>,

    /// The name of the shader this input comes from.
    pub shader_name: String,

    /// The name of the entry point.
    pub name: String,

    /// The shader stage.
    pub stage: Stage,

    /// The payload language.
    pub lang: Lang
}
