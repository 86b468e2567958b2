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

//! Shader compiler interface.
//!
//! Compilers are external collaborators (glslang, slang, SPIRV-Cross, the Metal toolchain...).
//! A [Compiler](Compiler) value holds whatever session or context its backend needs; it is
//! created once by the caller, passed by reference to the shader packer and released when
//! dropped.

use bytesutil::WriteBytes;

use crate::{manifest::StageDescription, Lang};

/// The result of compiling a shader source.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Output {
    /// A single payload for the first entry point (single entry point backends such as GLSL).
    Single(Vec<u8>),

    /// One payload per entry point, in the order of the manifest entry points.
    PerEntryPoint(Vec<Vec<u8>>)
}

impl Output {
    /// Returns true if this output has no usable payload at all.
    ///
    /// *An empty output indicates that the whole source failed to compile. A per entry point
    /// output with only some empty payloads is not empty: each empty payload is a failure of
    /// its own entry point.*
    pub fn is_empty(&self) -> bool {
        match self {
            Output::Single(v) => v.is_empty(),
            Output::PerEntryPoint(v) => v.iter().all(|v| v.is_empty())
        }
    }
}

/// A shader compiler backend.
///
/// # Examples
///
/// ```
/// use sbf::compile::{spirv_words_to_bytes, Compiler, Output};
/// use sbf::manifest::StageDescription;
/// use sbf::Lang;
///
/// struct Glsl;
///
/// impl Compiler for Glsl {
///     fn supports(&self, lang: Lang, target: Lang) -> bool {
///         lang == Lang::Glsl && target == Lang::Spirv
///     }
///
///     fn compile(&mut self, _: &StageDescription) -> Option<Output> {
///         Some(Output::Single(spirv_words_to_bytes(&[0x07230203])))
///     }
/// }
/// ```
pub trait Compiler {
    /// Returns true if this compiler can compile `lang` to `target`.
    fn supports(&self, lang: Lang, target: Lang) -> bool;

    /// Returns true if this compiler can compile several entry points of a source at once.
    ///
    /// *Sources with more than one entry point are never given to single entry point
    /// compilers. By default, a compiler handles a single entry point.*
    fn multiple_entry_points(&self) -> bool {
        false
    }

    /// Compiles a shader source.
    ///
    /// # Arguments
    ///
    /// * `desc`: the shader source to compile.
    ///
    /// returns: Option<Output>
    ///
    /// Returns None (or an empty [Output](Output)) if the source failed to compile; the
    /// compiler is expected to report its own diagnostics.
    fn compile(&mut self, desc: &StageDescription) -> Option<Output>;
}

impl<C: Compiler + ?Sized> Compiler for &mut C {
    fn supports(&self, lang: Lang, target: Lang) -> bool {
        (**self).supports(lang, target)
    }

    fn multiple_entry_points(&self) -> bool {
        (**self).multiple_entry_points()
    }

    fn compile(&mut self, desc: &StageDescription) -> Option<Output> {
        (**self).compile(desc)
    }
}

impl<C: Compiler + ?Sized> Compiler for Box<C> {
    fn supports(&self, lang: Lang, target: Lang) -> bool {
        (**self).supports(lang, target)
    }

    fn multiple_entry_points(&self) -> bool {
        (**self).multiple_entry_points()
    }

    fn compile(&mut self, desc: &StageDescription) -> Option<Output> {
        (**self).compile(desc)
    }
}

/// Converts SPIR-V words to their little-endian byte representation.
///
/// # Arguments
///
/// * `words`: the SPIR-V module words.
///
/// returns: Vec<u8>
///
/// # Examples
///
/// ```
/// use sbf::compile::spirv_words_to_bytes;
///
/// assert_eq!(spirv_words_to_bytes(&[0x07230203]), [0x03, 0x02, 0x23, 0x07]);
/// ```
pub fn spirv_words_to_bytes(words: &[u32]) -> Vec<u8> {
    let mut bytes = vec![0; words.len() * 4];
    for (word, chunk) in words.iter().zip(bytes.chunks_exact_mut(4)) {
        word.write_bytes_le(chunk);
    }
    bytes
}
