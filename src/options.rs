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

//! High-level utilities to configure the SBF decoder and the shader packer.

use std::path::{Path, PathBuf};

/// The default maximum size in bytes of a single shader payload (1Gb).
pub const DEFAULT_MAX_PAYLOAD_SIZE: u64 = 1 << 30;

/// The default output folder of the shader packer.
pub const DEFAULT_OUTPUT_DIR: &str = "shaders";

/// The default file extension of a packed SBF.
pub const DEFAULT_EXTENSION: &str = "shader";

/// Utility to open an SBF.
pub struct OpenOptions<T> {
    pub(crate) backend: T,
    pub(crate) check_bounds: bool,
    pub(crate) max_payload_size: u64
}

impl<T> OpenOptions<T> {
    /// Creates a new set of options for an SBF.
    ///
    /// # Arguments
    ///
    /// * `backend`: the IO backend to read the SBF from.
    ///
    /// returns: OpenOptions<T>
    pub fn new(backend: T) -> OpenOptions<T> {
        OpenOptions {
            backend,
            check_bounds: true,
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE
        }
    }

    /// Enables or disables checking that every shader description points at the next block in
    /// the data region.
    ///
    /// *By default, bounds checking is enabled.*
    ///
    /// **Disabling this check reads the data region linearly regardless of the stored offsets;
    /// only the relative distance between the offsets of a description is used.**
    ///
    /// # Arguments
    ///
    /// * `flag`: true to enable bounds checking, false otherwise.
    ///
    /// returns: OpenOptions<T>
    ///
    /// # Examples
    ///
    /// ```
    /// use sbf::options::OpenOptions;
    ///
    /// let options = OpenOptions::new(())
    ///     .check_bounds(false);
    /// ```
    pub fn check_bounds(mut self, flag: bool) -> Self {
        self.check_bounds = flag;
        self
    }

    /// Defines the maximum size in bytes of a single shader payload.
    ///
    /// *By default, the maximum size is [DEFAULT_MAX_PAYLOAD_SIZE](DEFAULT_MAX_PAYLOAD_SIZE).*
    ///
    /// # Arguments
    ///
    /// * `size`: the maximum payload size in bytes.
    ///
    /// returns: OpenOptions<T>
    pub fn max_payload_size(mut self, size: u64) -> Self {
        self.max_payload_size = size;
        self
    }
}

impl<T: std::io::Read> From<T> for OpenOptions<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

/// Decides what happens when a shader fails to compile while packing a manifest.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FailurePolicy {
    /// Abort the whole manifest.
    Abort,

    /// Skip the failed shader and keep packing the others.
    Skip
}

/// Utility to configure the shader packer.
///
/// # Examples
///
/// ```
/// use sbf::options::{FailurePolicy, PackOptions};
///
/// let options = PackOptions::new()
///     .output_dir("build/shaders")
///     .failure_policy(FailurePolicy::Skip);
/// assert_eq!(options.output_path("lit").to_str(), Some("build/shaders/lit.shader"));
/// ```
#[derive(Clone, Debug)]
pub struct PackOptions {
    pub(crate) output_dir: PathBuf,
    pub(crate) extension: String,
    pub(crate) failure_policy: FailurePolicy
}

impl Default for PackOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl PackOptions {
    /// Creates a new set of packer options.
    pub fn new() -> PackOptions {
        PackOptions {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            extension: String::from(DEFAULT_EXTENSION),
            failure_policy: FailurePolicy::Abort
        }
    }

    /// Defines the folder where packed SBFs are written.
    ///
    /// *By default, the output folder is [DEFAULT_OUTPUT_DIR](DEFAULT_OUTPUT_DIR) relative to
    /// the current directory.*
    ///
    /// # Arguments
    ///
    /// * `dir`: the output folder.
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().into();
        self
    }

    /// Defines the file extension of packed SBFs.
    ///
    /// *By default, the extension is [DEFAULT_EXTENSION](DEFAULT_EXTENSION).*
    ///
    /// # Arguments
    ///
    /// * `extension`: the extension without the leading dot.
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Defines what to do when a shader fails to compile.
    ///
    /// *By default, the whole manifest is aborted.*
    ///
    /// # Arguments
    ///
    /// * `policy`: the failure policy.
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Returns the path of the SBF packed for the given manifest name.
    pub fn output_path(&self, name: &str) -> PathBuf {
        let mut file_name = String::from(name);
        file_name.push('.');
        file_name.push_str(&self.extension);
        self.output_dir.join(file_name)
    }
}
