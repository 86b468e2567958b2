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

//! Shader packer: compiles the sources of a [Manifest](crate::manifest::Manifest) and packs the
//! results into an SBF file.

use std::{
    fmt::{Display, Formatter},
    path::PathBuf
};

use log::{info, warn};

use crate::{
    compile::{Compiler, Output},
    encoder::build_shader_library,
    error::WriteError,
    macros::impl_err_conversion,
    manifest::{Manifest, StageDescription},
    options::{FailurePolicy, PackOptions},
    ShaderInput
};

/// Represents a shader packer error.
#[derive(Debug)]
pub enum PackError {
    /// Describes an io error.
    Io(std::io::Error),

    /// Describes an SBF encoder error.
    Write(WriteError),

    /// The manifest does not list any shader source.
    NoShaders(String),

    /// No shader of the manifest could be compiled.
    AllFailed(String),

    /// A single entry point compiler was given a source with multiple entry points.
    TooManyEntryPoints {
        /// Path to the shader source.
        source: PathBuf,

        /// Number of entry points in the manifest.
        count: usize
    },

    /// A multiple entry point compiler did not return one payload per entry point.
    EntryPointCount {
        /// Path to the shader source.
        source: PathBuf,

        /// Number of entry points in the manifest.
        expected: usize,

        /// Number of payloads returned by the compiler.
        actual: usize
    },

    /// A shader source (or a single entry point of it) failed to compile.
    Compile {
        /// Path to the shader source.
        source: PathBuf,

        /// The entry point which failed, if the compiler reports entry points separately.
        entry_point: Option<String>
    }
}

impl_err_conversion!(
    PackError {
        std::io::Error => Io,
        WriteError => Write
    }
);

impl Display for PackError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PackError::Io(e) => write!(f, "io error: {}", e),
            PackError::Write(e) => write!(f, "SBF error: {}", e),
            PackError::NoShaders(name) => write!(f, "no shaders specified in manifest {}", name),
            PackError::AllFailed(name) => write!(
                f,
                "all shaders failed to compile, cannot build shader library {}",
                name
            ),
            PackError::TooManyEntryPoints { source, count } => write!(
                f,
                "cannot compile {} with {} entry points (only 1 is supported)",
                source.display(),
                count
            ),
            PackError::EntryPointCount {
                source,
                expected,
                actual
            } => write!(
                f,
                "compiler returned {} payload(s) for {} entry point(s) of {}",
                actual,
                expected,
                source.display()
            ),
            PackError::Compile {
                source,
                entry_point: Some(entry_point)
            } => write!(f, "failed to compile {} ({})", source.display(), entry_point),
            PackError::Compile {
                source,
                entry_point: None
            } => write!(f, "failed to compile {}", source.display())
        }
    }
}

impl std::error::Error for PackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PackError::Io(e) => Some(e),
            PackError::Write(e) => Some(e),
            _ => None
        }
    }
}

/// Compiles shader manifests and packs them into SBF files.
///
/// # Examples
///
/// ```
/// use sbf::compile::{Compiler, Output};
/// use sbf::manifest::{EntryPoint, Manifest, StageDescription};
/// use sbf::pack::Packer;
/// use sbf::{Lang, Stage};
///
/// struct Slang;
///
/// impl Compiler for Slang {
///     fn supports(&self, lang: Lang, target: Lang) -> bool {
///         lang == Lang::Slang && target == Lang::Spirv
///     }
///
///     fn multiple_entry_points(&self) -> bool {
///         true
///     }
///
///     fn compile(&mut self, desc: &StageDescription) -> Option<Output> {
///         Some(Output::PerEntryPoint(desc.entry_points.iter().map(|_| vec![0; 4]).collect()))
///     }
/// }
///
/// let manifest = Manifest {
///     name: "lit".into(),
///     shaders: vec![StageDescription {
///         source: "lit.slang".into(),
///         lang: Lang::Slang,
///         target: Lang::Spirv,
///         entry_points: vec![
///             EntryPoint { name: "vertexMain".into(), stage: Stage::Vertex },
///             EntryPoint { name: "fragmentMain".into(), stage: Stage::Fragment }
///         ]
///     }]
/// };
/// let mut packer = Packer::new().with_compiler(Slang);
/// let inputs = packer.collect_inputs(&manifest).unwrap();
/// assert_eq!(inputs.len(), 2);
/// assert_eq!(inputs[1].name, "fragmentMain");
/// assert_eq!(inputs[1].shader_name, "lit");
/// ```
pub struct Packer<'a> {
    compilers: Vec<Box<dyn Compiler + 'a>>,
    options: PackOptions
}

impl<'a> Default for Packer<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Packer<'a> {
    /// Creates a new packer with no compilers and default options.
    pub fn new() -> Packer<'a> {
        Packer {
            compilers: Vec::new(),
            options: PackOptions::new()
        }
    }

    /// Creates a new packer with no compilers.
    ///
    /// # Arguments
    ///
    /// * `options`: the packer options.
    pub fn with_options(options: PackOptions) -> Packer<'a> {
        Packer {
            compilers: Vec::new(),
            options
        }
    }

    /// Registers a compiler.
    ///
    /// *When several compilers support the same language pair, the first registered wins.*
    ///
    /// # Arguments
    ///
    /// * `compiler`: the compiler to register; `&mut C` may be used to keep ownership of a
    ///   compiler session.
    pub fn with_compiler(mut self, compiler: impl Compiler + 'a) -> Self {
        self.add_compiler(compiler);
        self
    }

    /// Registers a compiler, see [with_compiler](Packer::with_compiler).
    pub fn add_compiler(&mut self, compiler: impl Compiler + 'a) {
        self.compilers.push(Box::new(compiler));
    }

    /// Returns the options of this packer.
    pub fn options(&self) -> &PackOptions {
        &self.options
    }

    fn failure(&self, err: PackError) -> Result<(), PackError> {
        match self.options.failure_policy {
            FailurePolicy::Abort => Err(err),
            FailurePolicy::Skip => {
                warn!(">> {}, skipping", err);
                Ok(())
            }
        }
    }

    fn compile_desc(
        &mut self,
        desc: &StageDescription,
        inputs: &mut Vec<ShaderInput>
    ) -> Result<(), PackError> {
        let compiler = match self
            .compilers
            .iter_mut()
            .find(|v| v.supports(desc.lang, desc.target))
        {
            Some(v) => v,
            None => {
                warn!(
                    ">> Did not find a method to compile {} from {} to {}",
                    desc.source.display(),
                    desc.lang.name(),
                    desc.target.name()
                );
                return Ok(());
            }
        };
        if desc.entry_points.len() > 1 && !compiler.multiple_entry_points() {
            return Err(PackError::TooManyEntryPoints {
                source: desc.source.clone(),
                count: desc.entry_points.len()
            });
        }
        let output = match compiler.compile(desc) {
            Some(v) if !v.is_empty() => v,
            _ => {
                return self.failure(PackError::Compile {
                    source: desc.source.clone(),
                    entry_point: None
                })
            }
        };
        let shader_name = desc.shader_name();
        match output {
            Output::Single(data) => {
                if desc.entry_points.len() > 1 {
                    return Err(PackError::TooManyEntryPoints {
                        source: desc.source.clone(),
                        count: desc.entry_points.len()
                    });
                }
                let entry = &desc.entry_points[0];
                inputs.push(ShaderInput {
                    data,
                    shader_name,
                    name: entry.name.clone(),
                    stage: entry.stage,
                    lang: desc.target
                });
            },
            Output::PerEntryPoint(payloads) => {
                if payloads.len() != desc.entry_points.len() {
                    return self.failure(PackError::EntryPointCount {
                        source: desc.source.clone(),
                        expected: desc.entry_points.len(),
                        actual: payloads.len()
                    });
                }
                for (data, entry) in payloads.into_iter().zip(&desc.entry_points) {
                    if data.is_empty() {
                        self.failure(PackError::Compile {
                            source: desc.source.clone(),
                            entry_point: Some(entry.name.clone())
                        })?;
                        continue;
                    }
                    inputs.push(ShaderInput {
                        data,
                        shader_name: shader_name.clone(),
                        name: entry.name.clone(),
                        stage: entry.stage,
                        lang: desc.target
                    });
                }
            }
        }
        Ok(())
    }

    /// Compiles all shader sources of a manifest.
    ///
    /// Sources whose target language is their input language are copied verbatim. Sources
    /// without entry points, with a textual target language or which no registered compiler
    /// supports are skipped with a warning.
    ///
    /// # Arguments
    ///
    /// * `manifest`: the manifest to compile.
    ///
    /// returns: Result<Vec<ShaderInput>, PackError>
    ///
    /// # Errors
    ///
    /// A [PackError](PackError) is returned if the manifest is empty, if nothing could be
    /// compiled or, depending on the [FailurePolicy](crate::options::FailurePolicy), if a
    /// source failed to compile.
    pub fn collect_inputs(&mut self, manifest: &Manifest) -> Result<Vec<ShaderInput>, PackError> {
        if manifest.shaders.is_empty() {
            return Err(PackError::NoShaders(manifest.name.clone()));
        }
        let mut inputs = Vec::with_capacity(manifest.shaders.len());
        for desc in &manifest.shaders {
            info!(">> {}", desc.source.display());
            let front = match desc.entry_points.first() {
                Some(v) => v,
                None => {
                    warn!(">> No entry points specified for {}", desc.source.display());
                    continue;
                }
            };
            if !desc.target.is_binary() {
                warn!(
                    ">> Cannot store {} payloads, skipping {}",
                    desc.target.name(),
                    desc.source.display()
                );
                continue;
            }
            if desc.target == desc.lang {
                match std::fs::read(&desc.source) {
                    Ok(data) => inputs.push(ShaderInput {
                        data,
                        shader_name: desc.shader_name(),
                        name: front.name.clone(),
                        stage: front.stage,
                        lang: desc.target
                    }),
                    Err(e) => self.failure(e.into())?
                }
                continue;
            }
            self.compile_desc(desc, &mut inputs)?;
        }
        if inputs.is_empty() {
            return Err(PackError::AllFailed(manifest.name.clone()));
        }
        Ok(inputs)
    }

    /// Compiles a manifest and writes the resulting SBF.
    ///
    /// The SBF is written to [output_path](crate::options::PackOptions::output_path) for the
    /// manifest name; the output folder is created if it does not exist.
    ///
    /// # Arguments
    ///
    /// * `manifest`: the manifest to pack.
    ///
    /// returns: Result<PathBuf, PackError>
    ///
    /// # Errors
    ///
    /// A [PackError](PackError) is returned if the manifest could not be compiled or if the SBF
    /// could not be written.
    pub fn pack(&mut self, manifest: &Manifest) -> Result<PathBuf, PackError> {
        let inputs = self.collect_inputs(manifest)?;
        let bytes = build_shader_library(&inputs)?;
        std::fs::create_dir_all(&self.options.output_dir)?;
        let path = self.options.output_path(&manifest.name);
        std::fs::write(&path, bytes)?;
        info!("Wrote {} shader(s) to {}", inputs.len(), path.display());
        Ok(path)
    }
}
