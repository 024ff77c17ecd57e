//! The signature manifest handed over by the source analyzer.
//!
//! ```json
//! { "files": [ { "path": "pkg/calc.py",
//!                "functions": [ { "name": "add",
//!                                 "args": [ { "name": "a", "annotation": "int" } ],
//!                                 "return_type": "int" } ],
//!                "classes": [ { "name": "Stack", "methods": [ { "name": "push" } ] } ] } ] }
//! ```
//!
//! Annotations are either raw annotation text (classified here) or a
//! structured `TypeDescriptor` object. Missing, `null` and empty
//! annotations are `Unknown`.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use propgen_types::{Parameter, SignatureModel, SourceSignature, TypeDescriptor};

use crate::error::PropgenError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub files: Vec<ManifestFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestFile {
    pub path: String,
    #[serde(default)]
    pub functions: Vec<ManifestFunction>,
    #[serde(default)]
    pub classes: Vec<ManifestClass>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestClass {
    pub name: String,
    #[serde(default)]
    pub methods: Vec<ManifestFunction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestFunction {
    pub name: String,
    #[serde(default)]
    pub args: Vec<ManifestArg>,
    #[serde(default)]
    pub return_type: Option<Annotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestArg {
    pub name: String,
    #[serde(default)]
    pub annotation: Option<Annotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Annotation {
    Text(String),
    Structured(TypeDescriptor),
}

impl Annotation {
    pub fn to_descriptor(&self) -> TypeDescriptor {
        match self {
            Annotation::Text(text) => propgen_annotation::classify(text),
            Annotation::Structured(descriptor) => descriptor.clone(),
        }
    }
}

fn descriptor_of(annotation: Option<&Annotation>) -> TypeDescriptor {
    annotation.map_or(TypeDescriptor::Unknown, Annotation::to_descriptor)
}

fn parameters(args: &[ManifestArg]) -> Vec<Parameter> {
    args.iter()
        .map(|a| Parameter::new(a.name.clone(), descriptor_of(a.annotation.as_ref())))
        .collect()
}

impl Manifest {
    /// Parse a manifest from JSON text.
    pub fn parse(json: &str) -> Result<Self, PropgenError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a manifest file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        Ok(Self::parse(&text)?)
    }

    /// Signature models in discovery order: files in order, then each file's
    /// functions, then each class's methods.
    ///
    /// A leading `self` or `cls` argument of a method is the receiver, not a
    /// parameter.
    pub fn sources(&self) -> Vec<SourceSignature> {
        let mut out = Vec::new();
        for file in &self.files {
            for function in &file.functions {
                out.push(SourceSignature {
                    file: file.path.clone(),
                    signature: SignatureModel::function(
                        function.name.clone(),
                        parameters(&function.args),
                        descriptor_of(function.return_type.as_ref()),
                    ),
                });
            }
            for class in &file.classes {
                for method in &class.methods {
                    let args = match method.args.split_first() {
                        Some((first, rest)) if first.name == "self" || first.name == "cls" => rest,
                        _ => method.args.as_slice(),
                    };
                    out.push(SourceSignature {
                        file: file.path.clone(),
                        signature: SignatureModel::method(
                            class.name.clone(),
                            method.name.clone(),
                            parameters(args),
                            descriptor_of(method.return_type.as_ref()),
                        ),
                    });
                }
            }
        }
        out
    }
}
