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

//! Error declarations.

use std::fmt::{Display, Formatter};

use crate::{
    macros::{impl_err_conversion, named_enum},
    Lang
};

named_enum!(
    /// Represents the context of an EOS (End Of Stream) error.
    EosContext {
        /// Reached EOS while reading the shader description table.
        Description: "shader description",

        /// Reached EOS while reading an entry point name.
        EntryName: "entry point name",

        /// Reached EOS while reading a shader name.
        ShaderName: "shader name",

        /// Reached EOS while reading a shader payload.
        Payload: "shader payload"
    }
);

named_enum!(
    /// Represents the context of an invalid code.
    InvalidCodeContext {
        /// Invalid shader stage code.
        Stage: "stage",

        /// Invalid shader language code.
        Lang: "language"
    }
);

/// Formats a four-character code for diagnostics.
pub(crate) fn fourcc_to_string(code: u32) -> String {
    String::from_utf8_lossy(&code.to_le_bytes()).into_owned()
}

/// Represents an SBF read error.
#[derive(Debug)]
pub enum ReadError {
    /// Describes an io error.
    Io(std::io::Error),

    /// The source is smaller than an SBF header.
    Truncated(usize),

    /// The magic constant of the file header does not match.
    BadMagic {
        /// Magic value found in the file.
        found: u32,

        /// Magic value expected by this decoder.
        expected: u32
    },

    /// Describes an EOS (End Of Stream) error while reading.
    Eos(EosContext),

    /// An invalid stage or language code.
    ///
    /// # Arguments
    /// * the context.
    /// * the coding value.
    InvalidCode(InvalidCodeContext, u16),

    /// The offsets of a shader description are not ordered as
    /// \[entry point name, shader name, payload\].
    OffsetOrder(usize),

    /// A shader description points somewhere else than the next block in the data region.
    Offset {
        /// Index of the shader description.
        index: usize,

        /// Position of the next block in the data region.
        expected: u64,

        /// Offset stored in the shader description.
        actual: u64
    },

    /// A shader payload exceeds the maximum allowed size.
    PayloadSize {
        /// Index of the shader description.
        index: usize,

        /// Size stored in the shader description.
        size: u64,

        /// Maximum allowed size.
        max: u64
    },

    /// A name is not valid UTF-8.
    Utf8(EosContext)
}

impl_err_conversion!(ReadError { std::io::Error => Io });

impl Display for ReadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::Io(e) => write!(f, "io error: {}", e),
            ReadError::Truncated(size) => write!(f, "truncated file ({} bytes)", size),
            ReadError::BadMagic { found, expected } => write!(
                f,
                "invalid container (magic {} != {})",
                fourcc_to_string(*found),
                fourcc_to_string(*expected)
            ),
            ReadError::Eos(ctx) => write!(f, "got EOS while reading {}", ctx.name()),
            ReadError::InvalidCode(ctx, code) => {
                write!(f, "invalid {} code ({:#x})", ctx.name(), code)
            },
            ReadError::OffsetOrder(index) => {
                write!(f, "unordered offsets in shader description #{}", index)
            },
            ReadError::Offset {
                index,
                expected,
                actual
            } => write!(
                f,
                "shader description #{} points at {} but the next block starts at {}",
                index, actual, expected
            ),
            ReadError::PayloadSize { index, size, max } => write!(
                f,
                "shader #{} payload is too large ({} > {} bytes)",
                index, size, max
            ),
            ReadError::Utf8(ctx) => write!(f, "utf8 decoding error in {}", ctx.name())
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::Io(e) => Some(e),
            _ => None
        }
    }
}

/// Represents an SBF write error.
#[derive(Debug)]
pub enum WriteError {
    /// Describes an io error.
    Io(std::io::Error),

    /// Too many shaders for a single container (max is 65535).
    Capacity(usize),

    /// A shader payload is tagged with a textual language (only SPIRV and AIR can be stored).
    TextualLang {
        /// Index of the offending shader input.
        index: usize,

        /// The language of the shader input.
        lang: Lang
    }
}

impl_err_conversion!(WriteError { std::io::Error => Io });

impl Display for WriteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteError::Io(e) => write!(f, "io error: {}", e),
            WriteError::Capacity(count) => {
                write!(f, "maximum shader count exceeded ({} > 65535)", count)
            },
            WriteError::TextualLang { index, lang } => write!(
                f,
                "shader input #{} cannot be stored as {} (expected SPIRV or AIR)",
                index,
                lang.name()
            )
        }
    }
}

impl std::error::Error for WriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WriteError::Io(e) => Some(e),
            _ => None
        }
    }
}
