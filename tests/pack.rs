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

use std::path::Path;

use sbf::compile::{spirv_words_to_bytes, Compiler, Output};
use sbf::manifest::{EntryPoint, Manifest, StageDescription};
use sbf::options::{FailurePolicy, PackOptions};
use sbf::pack::{PackError, Packer};
use sbf::{Lang, ShaderLibrary, Stage};

/// Single entry point compiler returning the source file name as payload.
struct FakeGlsl {
    calls: usize
}

impl Compiler for FakeGlsl {
    fn supports(&self, lang: Lang, target: Lang) -> bool {
        lang == Lang::Glsl && target == Lang::Spirv
    }

    fn compile(&mut self, desc: &StageDescription) -> Option<Output> {
        self.calls += 1;
        if desc.source.ends_with("broken.vert") {
            return None;
        }
        Some(Output::Single(spirv_words_to_bytes(&[0x07230203, self.calls as u32])))
    }
}

/// Multiple entry point compiler failing on entry points named "broken".
struct FakeSlang;

impl Compiler for FakeSlang {
    fn supports(&self, lang: Lang, target: Lang) -> bool {
        lang == Lang::Slang && target == Lang::Spirv
    }

    fn multiple_entry_points(&self) -> bool {
        true
    }

    fn compile(&mut self, desc: &StageDescription) -> Option<Output> {
        let payloads = desc
            .entry_points
            .iter()
            .map(|v| {
                if v.name == "broken" {
                    Vec::new()
                } else {
                    v.name.as_bytes().to_vec()
                }
            })
            .collect();
        Some(Output::PerEntryPoint(payloads))
    }
}

fn entry(name: &str, stage: Stage) -> EntryPoint {
    EntryPoint {
        name: name.into(),
        stage
    }
}

fn desc(
    source: impl AsRef<Path>,
    lang: Lang,
    target: Lang,
    entry_points: Vec<EntryPoint>
) -> StageDescription {
    StageDescription {
        source: source.as_ref().into(),
        lang,
        target,
        entry_points
    }
}

#[test]
fn test_pack_slang_and_glsl() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = Manifest {
        name: "lit".into(),
        shaders: vec![
            desc("lit.slang", Lang::Slang, Lang::Spirv, vec![
                entry("vertexMain", Stage::Vertex),
                entry("fragmentMain", Stage::Fragment),
            ]),
            desc("shadow.vert", Lang::Glsl, Lang::Spirv, vec![entry("main", Stage::Vertex)]),
        ]
    };
    let mut glsl = FakeGlsl { calls: 0 };
    let mut packer = Packer::with_options(PackOptions::new().output_dir(dir.path().join("out")))
        .with_compiler(FakeSlang)
        .with_compiler(&mut glsl);
    let path = packer.pack(&manifest).unwrap();
    drop(packer);
    assert_eq!(glsl.calls, 1);
    assert_eq!(path, dir.path().join("out").join("lit.shader"));

    let library = ShaderLibrary::open_file(&path).unwrap();
    assert_eq!(library.name(), Some("lit"));
    assert_eq!(library.shader_names(), ["lit", "lit", "shadow"]);
    let binaries = library.binaries();
    assert_eq!(binaries[0].name, "vertexMain");
    assert_eq!(binaries[0].data, b"vertexMain");
    assert_eq!(binaries[1].stage, Stage::Fragment);
    assert_eq!(binaries[2].data, [0x03, 0x02, 0x23, 0x07, 0x01, 0x00, 0x00, 0x00]);
    assert_eq!(library.get_binary_by_stage(Stage::Vertex).unwrap().name, "vertexMain");
    assert_eq!(library.get_binary_by_name("shadow").unwrap().lang, Lang::Spirv);
}

#[test]
fn test_pack_copy_when_target_is_lang() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("precompiled.spv");
    std::fs::write(&source, [1u8, 2, 3, 4]).unwrap();
    let manifest = Manifest {
        name: "precompiled".into(),
        shaders: vec![desc(&source, Lang::Spirv, Lang::Spirv, vec![
            entry("main", Stage::Compute),
            entry("unused", Stage::Compute),
        ])]
    };
    let inputs = Packer::new().collect_inputs(&manifest).unwrap();
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].data, [1, 2, 3, 4]);
    assert_eq!(inputs[0].name, "main");
    assert_eq!(inputs[0].shader_name, "precompiled");
    assert_eq!(inputs[0].stage, Stage::Compute);
}

#[test]
fn test_pack_failure_policy() {
    let manifest = Manifest {
        name: "mixed".into(),
        shaders: vec![
            desc("broken.vert", Lang::Glsl, Lang::Spirv, vec![entry("main", Stage::Vertex)]),
            desc("fine.vert", Lang::Glsl, Lang::Spirv, vec![entry("main", Stage::Vertex)]),
            desc("multi.slang", Lang::Slang, Lang::Spirv, vec![
                entry("broken", Stage::Vertex),
                entry("ok", Stage::Fragment),
            ]),
        ]
    };
    let err = Packer::new()
        .with_compiler(FakeGlsl { calls: 0 })
        .collect_inputs(&manifest)
        .unwrap_err();
    assert!(matches!(err, PackError::Compile { entry_point: None, .. }));

    let inputs = Packer::with_options(PackOptions::new().failure_policy(FailurePolicy::Skip))
        .with_compiler(FakeGlsl { calls: 0 })
        .with_compiler(FakeSlang)
        .collect_inputs(&manifest)
        .unwrap();
    let names: Vec<_> = inputs.iter().map(|v| (v.shader_name.as_str(), v.name.as_str())).collect();
    assert_eq!(names, [("fine", "main"), ("multi", "ok")]);

    let err = Packer::new()
        .with_compiler(FakeSlang)
        .collect_inputs(&Manifest {
            name: "multi".into(),
            shaders: manifest.shaders[2..].to_vec()
        })
        .unwrap_err();
    assert!(matches!(err, PackError::Compile { entry_point: Some(ref v), .. } if v == "broken"));
}

#[test]
fn test_pack_too_many_entry_points() {
    let manifest = Manifest {
        name: "glsl".into(),
        shaders: vec![desc("two.vert", Lang::Glsl, Lang::Spirv, vec![
            entry("a", Stage::Vertex),
            entry("b", Stage::Vertex),
        ])]
    };
    let err = Packer::with_options(PackOptions::new().failure_policy(FailurePolicy::Skip))
        .with_compiler(FakeGlsl { calls: 0 })
        .collect_inputs(&manifest)
        .unwrap_err();
    assert!(matches!(err, PackError::TooManyEntryPoints { count: 2, .. }));
}

#[test]
fn test_pack_too_many_entry_points_before_compile() {
    //The source would fail to compile, but its entry points are rejected first
    let manifest = Manifest {
        name: "glsl".into(),
        shaders: vec![desc("broken.vert", Lang::Glsl, Lang::Spirv, vec![
            entry("a", Stage::Vertex),
            entry("b", Stage::Fragment),
        ])]
    };
    let mut glsl = FakeGlsl { calls: 0 };
    let err = Packer::with_options(PackOptions::new().failure_policy(FailurePolicy::Skip))
        .with_compiler(&mut glsl)
        .collect_inputs(&manifest)
        .unwrap_err();
    assert!(matches!(err, PackError::TooManyEntryPoints { count: 2, .. }));
    assert_eq!(glsl.calls, 0);
}

#[test]
fn test_pack_whole_output_failed() {
    let manifest = Manifest {
        name: "multi".into(),
        shaders: vec![desc("multi.slang", Lang::Slang, Lang::Spirv, vec![
            entry("broken", Stage::Vertex),
            entry("broken", Stage::Fragment),
        ])]
    };
    let err = Packer::new()
        .with_compiler(FakeSlang)
        .collect_inputs(&manifest)
        .unwrap_err();
    assert!(matches!(err, PackError::Compile { entry_point: None, .. }));
}

#[test]
fn test_pack_nothing_to_do() {
    let err = Packer::new()
        .collect_inputs(&Manifest {
            name: "empty".into(),
            shaders: Vec::new()
        })
        .unwrap_err();
    assert!(matches!(err, PackError::NoShaders(ref v) if v == "empty"));

    //Unsupported, textual or entry point less sources are skipped
    let manifest = Manifest {
        name: "skipped".into(),
        shaders: vec![
            desc("a.hlsl", Lang::Hlsl, Lang::Spirv, vec![entry("main", Stage::Vertex)]),
            desc("b.slang", Lang::Slang, Lang::Msl, vec![entry("main", Stage::Vertex)]),
            desc("c.slang", Lang::Slang, Lang::Spirv, Vec::new()),
        ]
    };
    let err = Packer::new()
        .with_compiler(FakeSlang)
        .collect_inputs(&manifest)
        .unwrap_err();
    assert!(matches!(err, PackError::AllFailed(ref v) if v == "skipped"));
    assert_eq!(
        err.to_string(),
        "all shaders failed to compile, cannot build shader library skipped"
    );
}

#[test]
fn test_pack_missing_source() {
    let manifest = Manifest {
        name: "missing".into(),
        shaders: vec![desc(
            "does/not/exist.spv",
            Lang::Spirv,
            Lang::Spirv,
            vec![entry("main", Stage::Vertex)]
        )]
    };
    let err = Packer::new().collect_inputs(&manifest).unwrap_err();
    assert!(matches!(err, PackError::Io(_)));
}
