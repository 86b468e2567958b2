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

use std::io::Write;

use sbf::encoder::{build_shader_library, write_shader_library};
use sbf::error::ReadError;
use sbf::header::{ShaderDescription, Struct, MAX_SHADER_COUNT, SIZE_FILE_HEADER};
use sbf::options::OpenOptions;
use sbf::{Lang, ShaderInput, ShaderLibrary, Stage};

fn input(shader_name: &str, name: &str, stage: Stage, data: &[u8]) -> ShaderInput {
    ShaderInput {
        data: data.to_vec(),
        shader_name: shader_name.into(),
        name: name.into(),
        stage,
        lang: Lang::Spirv
    }
}

fn sample() -> Vec<ShaderInput> {
    vec![
        input("tonemap", "main", Stage::Fragment, &[0xDE, 0xAD]),
        input("blur", "main", Stage::Compute, &[0xBE, 0xEF])
    ]
}

#[test]
fn test_sbf_round_trip() {
    let mut inputs = sample();
    inputs.push(ShaderInput {
        data: (0..=255).collect(),
        shader_name: "lit".into(),
        name: "vertexMain".into(),
        stage: Stage::Vertex,
        lang: Lang::Air
    });
    inputs.push(input("rt", "raygen", Stage::RayGen, &[]));
    let bytes = build_shader_library(&inputs).unwrap();
    let library = ShaderLibrary::read(bytes.as_slice()).unwrap();
    assert_eq!(library.len(), inputs.len());
    for (binary, input) in library.iter().zip(&inputs) {
        assert_eq!(binary.data, input.data);
        assert_eq!(binary.name, input.name);
        assert_eq!(binary.shader_name, input.shader_name);
        assert_eq!(binary.stage, input.stage);
        assert_eq!(binary.lang, input.lang);
    }
    assert_eq!(library.shader_names(), ["tonemap", "blur", "lit", "rt"]);
    assert_eq!(library.name(), None);
}

#[test]
fn test_sbf_empty() {
    let bytes = build_shader_library(&[]).unwrap();
    assert_eq!(bytes.len(), SIZE_FILE_HEADER);
    let library = ShaderLibrary::read(bytes.as_slice()).unwrap();
    assert!(library.is_empty());
    assert!(library.shader_names().is_empty());
}

#[test]
fn test_sbf_bad_magic() {
    let mut bytes = build_shader_library(&sample()).unwrap();
    bytes[0..4].copy_from_slice(b"ABCD");
    let err = ShaderLibrary::read(bytes.as_slice()).unwrap_err();
    assert!(matches!(err.error(), ReadError::BadMagic { .. }));
    assert!(err.error().to_string().contains("ABCD"));
    assert!(err.error().to_string().contains("!SBF"));
    assert!(err.unwrap_value().is_empty());
    assert!(ShaderLibrary::load(bytes.as_slice()).is_empty());
}

#[test]
fn test_sbf_truncated() {
    let bytes = build_shader_library(&sample()).unwrap();
    let err = ShaderLibrary::read(&bytes[..SIZE_FILE_HEADER - 1]).unwrap_err();
    assert!(matches!(err.error(), ReadError::Truncated(7)));
    assert!(err.unwrap_value().is_empty());
    assert!(ShaderLibrary::load(&b""[..]).is_empty());
}

#[test]
fn test_sbf_max_shader_count() {
    let inputs = vec![input("s", "m", Stage::Miss, &[]); MAX_SHADER_COUNT];
    let bytes = build_shader_library(&inputs).unwrap();
    assert_eq!(&bytes[4..6], &[0xFF, 0xFF]);
    let library = ShaderLibrary::read(bytes.as_slice()).unwrap();
    assert_eq!(library.len(), MAX_SHADER_COUNT);
    let last = &library.binaries()[MAX_SHADER_COUNT - 1];
    assert_eq!(last.name, "m");
    assert_eq!(last.shader_name, "s");
    assert!(last.data.is_empty());
}

#[test]
fn test_sbf_lookup_by_name() {
    let bytes = build_shader_library(&sample()).unwrap();
    let library = ShaderLibrary::read(bytes.as_slice()).unwrap();
    let blur = library.get_binary_by_name("blur").unwrap();
    assert_eq!(blur.data, [0xBE, 0xEF]);
    assert_eq!(blur.stage, Stage::Compute);
    assert!(library.get_binary_by_name("missing").is_none());
    //Lookup is on the shader name, not the entry point name
    assert!(library.get_binary_by_name("main").is_none());
}

#[test]
fn test_sbf_lookup_by_stage_first_match() {
    let inputs = vec![
        input("a", "main", Stage::Fragment, &[0xA]),
        input("b", "main", Stage::Fragment, &[0xB])
    ];
    let bytes = build_shader_library(&inputs).unwrap();
    let library = ShaderLibrary::read(bytes.as_slice()).unwrap();
    assert_eq!(library.get_binary_by_stage(Stage::Fragment).unwrap().data, [0xA]);
    assert!(library.get_binary_by_stage(Stage::Miss).is_none());
}

#[test]
fn test_sbf_duplicate_names() {
    let inputs = vec![
        input("same", "first", Stage::Vertex, &[1]),
        input("same", "second", Stage::Fragment, &[2])
    ];
    let bytes = build_shader_library(&inputs).unwrap();
    let library = ShaderLibrary::read(bytes.as_slice()).unwrap();
    assert_eq!(library.len(), 2);
    assert_eq!(library.get_binary_by_name("same").unwrap().name, "first");
}

#[test]
fn test_sbf_offset_derivation() {
    let bytes = build_shader_library(&[input("shader", "main", Stage::Vertex, &[7; 10])]).unwrap();
    let desc = ShaderDescription::read(&bytes[SIZE_FILE_HEADER..]).unwrap();
    assert_eq!(desc.shader_name_offset - desc.name_offset, 4);
    assert_eq!(desc.byte_offset - desc.shader_name_offset, 6);
    assert_eq!(desc.byte_size, 10);
}

#[test]
fn test_sbf_linear_read_ignores_absolute_offsets() {
    let mut bytes = build_shader_library(&sample()).unwrap();
    //Shift every offset of the first description by the same amount
    let mut desc = ShaderDescription::read(&bytes[SIZE_FILE_HEADER..]).unwrap();
    desc.name_offset += 100;
    desc.shader_name_offset += 100;
    desc.byte_offset += 100;
    bytes[SIZE_FILE_HEADER..SIZE_FILE_HEADER + 40].copy_from_slice(&desc.to_bytes());
    assert!(matches!(
        ShaderLibrary::read(bytes.as_slice()).unwrap_err().error(),
        ReadError::Offset { index: 0, .. }
    ));
    let library =
        ShaderLibrary::read(OpenOptions::new(bytes.as_slice()).check_bounds(false)).unwrap();
    assert_eq!(library.get_binary_by_name("blur").unwrap().data, [0xBE, 0xEF]);
}

#[test]
fn test_sbf_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("post.shader");
    {
        let mut file = std::fs::File::create(&path).unwrap();
        write_shader_library(&mut file, &sample()).unwrap();
        file.flush().unwrap();
    }
    let library = ShaderLibrary::open_file(&path).unwrap();
    assert_eq!(library.name(), Some("post"));
    assert_eq!(library.len(), 2);

    let missing = ShaderLibrary::open_file(dir.path().join("missing.shader")).unwrap_err();
    assert!(matches!(missing.error(), ReadError::Io(_)));
    assert!(ShaderLibrary::load_file(dir.path().join("missing.shader")).is_empty());
}
