//! Shared test utilities for execute and integration tests.
//!
//! Provides a sample domain package and a builder for ad hoc package
//! directories in a temp dir.

use std::fs;

use tempfile::TempDir;

/// Type dictionary for the sample package.
pub const TYPES_YAML: &str = "\
Name: string
ID: int
Count: integer
";

/// Animals subsystem: a generalization, an ordinal relationship, and an
/// association whose target class lives in the Ownership subsystem.
pub const ANIMALS_JSON: &str = r#"{
    "name": "Animals",
    "domain": "Pets",
    "classes": [
        {"name": "Animal", "attributes": [
            {"name": "ID", "type": "ID", "I": [[1, false]]},
            {"name": "Species", "type": "Name"}
        ]},
        {"name": "Dog", "attributes": [
            {"name": "Name", "type": "Name", "I": [1]},
            {"name": "AnimalID", "type": "ID"},
            {"name": "WalkerName", "type": "Name"}
        ]},
        {"name": "Cat", "attributes": [
            {"name": "Name", "type": "Name", "I": [1]},
            {"name": "AnimalID", "type": "ID"}
        ]}
    ],
    "rels": [
        {"rnum": "R2", "superclass": "Animal", "subclasses": ["Dog", "Cat"],
         "genrefs": [{"source": {"class": "Dog", "attrs": ["AnimalID"]},
                      "target": {"class": "Animal", "attrs": ["ID"]}}]},
        {"rnum": "O1", "ascend": {"cname": "Dog", "highval": "older", "lowval": "younger"}},
        {"rnum": "R5",
         "t_side": {"cname": "Owner", "mult": "1c", "phrase": "walks"},
         "p_side": {"cname": "Dog", "mult": "Mc", "phrase": "is walked by"},
         "ref1": {"source": {"class": "Dog", "attrs": ["WalkerName"]},
                  "target": {"class": "Owner", "attrs": ["OwnerName"]}}}
    ]
}"#;

/// Ownership subsystem: an association class and an association to a class
/// imported from another domain.
pub const OWNERSHIP_JSON: &str = r#"{
    "name": "Ownership",
    "domain": "Pets",
    "classes": [
        {"name": "Owner", "attributes": [
            {"name": "OwnerName", "type": "Name", "I": [1]}
        ]},
        {"name": "Ownership", "attributes": [
            {"name": "OwnerName", "type": "Name", "I": [1]},
            {"name": "DogName", "type": "Name", "I": [1]}
        ]},
        {"name": "Party", "import": "Accounts"}
    ],
    "rels": [
        {"rnum": "R4", "assoc_cname": "Ownership",
         "t_side": {"cname": "Owner", "mult": "Mc", "phrase": "owns"},
         "p_side": {"cname": "Dog", "mult": "1", "phrase": "is owned by"},
         "ref1": {"source": {"class": "Ownership", "attrs": ["OwnerName"]},
                  "target": {"class": "Owner", "attrs": ["OwnerName"]}},
         "ref2": {"source": {"class": "Ownership", "attrs": ["DogName"]},
                  "target": {"class": "Dog", "attrs": ["Name"]}}},
        {"rnum": "R1",
         "t_side": {"cname": "Owner", "mult": "1c", "phrase": "is"},
         "p_side": {"cname": "Party", "mult": "1", "phrase": "acts as"},
         "ref1": {"source": {"class": "Owner", "attrs": ["OwnerName"]},
                  "target": {"class": "Party", "attrs": ["Name"]}}}
    ]
}"#;

/// Builds a domain package directory file by file.
#[derive(Default)]
pub struct PackageBuilder {
    files: Vec<(String, String)>,
}

impl PackageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, name: &str, content: &str) -> Self {
        self.files.push((name.to_string(), content.to_string()));
        self
    }

    pub fn build(self) -> TempDir {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        for (name, content) in &self.files {
            fs::write(dir.path().join(name), content).expect("Failed to write package file");
        }
        dir
    }

    /// The two-subsystem Pets package with its type dictionary.
    pub fn sample() -> TempDir {
        Self::new()
            .file("animals.json", ANIMALS_JSON)
            .file("ownership.json", OWNERSHIP_JSON)
            .file("types.yaml", TYPES_YAML)
            .build()
    }
}
