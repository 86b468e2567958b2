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

//! Shader manifest declarations.
//!
//! A manifest describes a shader program: its name (used to name the packed SBF) and the list of
//! source files to compile, each with its input language, its target language and its entry
//! points. Enable the `serde` feature to (de)serialize manifests; field names follow the JSON
//! layout used by shader projects:
//!
//! ```json
//! {
//!     "name": "lit",
//!     "shaders": [
//!         {
//!             "source": "lit.slang",
//!             "lang": "SLANG",
//!             "target": "SPIRV",
//!             "entryPoints": [
//!                 { "name": "vertexMain", "stage": "vertex" },
//!                 { "name": "fragmentMain", "stage": "fragment" }
//!             ]
//!         }
//!     ]
//! }
//! ```

use std::path::{Path, PathBuf};

use crate::{Lang, Stage};

/// An entry point of a shader source.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntryPoint {
    /// The name of the entry point function.
    pub name: String,

    /// The stage of the entry point.
    pub stage: Stage
}

/// A shader source to compile.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct StageDescription {
    /// Path to the source file.
    pub source: PathBuf,

    /// The language of the source file.
    pub lang: Lang,

    /// The language to compile to.
    pub target: Lang,

    /// The entry points to compile, in order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub entry_points: Vec<EntryPoint>
}

impl StageDescription {
    /// Returns the logical shader name of this source (its file stem).
    pub fn shader_name(&self) -> String {
        self.source
            .file_stem()
            .map(|v| v.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// A shader program manifest.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Manifest {
    /// The name of the shader program.
    pub name: String,

    /// The shader sources of the program.
    #[cfg_attr(feature = "serde", serde(default))]
    pub shaders: Vec<StageDescription>
}

impl Manifest {
    /// Makes every relative source path relative to `base` instead.
    ///
    /// *This is usually called with the folder containing the manifest file.*
    ///
    /// # Arguments
    ///
    /// * `base`: the folder to resolve source paths against.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use sbf::manifest::{Manifest, StageDescription};
    /// use sbf::Lang;
    ///
    /// let mut manifest = Manifest {
    ///     name: "lit".into(),
    ///     shaders: vec![StageDescription {
    ///         source: "lit.vert".into(),
    ///         lang: Lang::Glsl,
    ///         target: Lang::Spirv,
    ///         entry_points: Vec::new()
    ///     }]
    /// };
    /// manifest.resolve_sources(Path::new("assets"));
    /// assert_eq!(manifest.shaders[0].source, Path::new("assets").join("lit.vert"));
    /// ```
    pub fn resolve_sources(&mut self, base: &Path) {
        for desc in &mut self.shaders {
            if desc.source.is_relative() {
                desc.source = base.join(&desc.source);
            }
        }
    }
}
