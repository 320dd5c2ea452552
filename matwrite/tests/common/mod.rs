//! Minimal MAT-file walker used to read back what the writer produced.
//!
//! Only understands the subset the writer emits: uncompressed `miMATRIX`
//! elements holding doubles, UTF-16 chars, or nested cells.

#![allow(dead_code)]

use std::path::Path;

use tempfile::NamedTempFile;

/// A decoded variable.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Double {
        rows: usize,
        cols: usize,
        data: Vec<f64>,
    },
    Char {
        rows: usize,
        cols: usize,
        text: String,
    },
    Cell {
        rows: usize,
        cols: usize,
        cells: Vec<Value>,
    },
}

impl Value {
    pub fn double(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        Value::Double { rows, cols, data }
    }

    /// The 0x0 double written for empty variables and cells.
    pub fn empty() -> Self {
        Value::double(0, 0, vec![])
    }

    /// A 1xN char array.
    pub fn text(text: &str) -> Self {
        Value::Char {
            rows: 1,
            cols: text.encode_utf16().count(),
            text: text.to_string(),
        }
    }

    pub fn dims(&self) -> (usize, usize) {
        match self {
            Value::Double { rows, cols, .. }
            | Value::Char { rows, cols, .. }
            | Value::Cell { rows, cols, .. } => (*rows, *cols),
        }
    }
}

/// A decoded top-level variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub value: Value,
    /// Declared length of the `miMATRIX` element.
    pub declared_len: usize,
}

/// Create a temporary file path for a test output.
pub fn temp_mat() -> NamedTempFile {
    tempfile::Builder::new()
        .suffix(".mat")
        .tempfile()
        .expect("Failed to create temp file")
}

pub fn read_bytes(path: &Path) -> Vec<u8> {
    std::fs::read(path).expect("Failed to read MAT file")
}

fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

fn i32_at(bytes: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

fn padded(len: usize) -> usize {
    (len + 7) / 8 * 8
}

/// Read one element starting at `offset`; returns (type, payload, next offset).
fn element(bytes: &[u8], offset: usize) -> (u32, &[u8], usize) {
    let ty = u32_at(bytes, offset);
    let len = u32_at(bytes, offset + 4) as usize;
    let payload = &bytes[offset + 8..offset + 8 + len];
    (ty, payload, offset + 8 + padded(len))
}

/// Decode the payload of a `miMATRIX` element.
fn matrix(payload: &[u8]) -> (String, Value) {
    let (ty, flags, next) = element(payload, 0);
    assert_eq!(ty, 6, "flags must be miUINT32");
    let class = u32_at(flags, 0);

    let (ty, dims, next) = element(payload, next);
    assert_eq!(ty, 5, "dims must be miINT32");
    let rows = i32_at(dims, 0) as usize;
    let cols = i32_at(dims, 4) as usize;

    let (ty, name, mut next) = element(payload, next);
    assert_eq!(ty, 1, "name must be miINT8");
    let name = String::from_utf8(name.to_vec()).unwrap();

    let value = match class {
        6 => {
            let (ty, data, end) = element(payload, next);
            assert_eq!(ty, 9, "double data must be miDOUBLE");
            assert_eq!(end, payload.len());
            let data = data
                .chunks_exact(8)
                .map(|c| f64::from_le_bytes(c.try_into().unwrap()))
                .collect();
            Value::Double { rows, cols, data }
        }
        4 => {
            let (ty, data, end) = element(payload, next);
            assert_eq!(ty, 4, "char data must be miUINT16");
            assert_eq!(end, payload.len());
            let units: Vec<u16> = data
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes(c.try_into().unwrap()))
                .collect();
            Value::Char {
                rows,
                cols,
                text: String::from_utf16(&units).unwrap(),
            }
        }
        1 => {
            let mut cells = Vec::new();
            while next < payload.len() {
                let (ty, nested, end) = element(payload, next);
                assert_eq!(ty, 14, "cells must be miMATRIX");
                let (cell_name, value) = matrix(nested);
                assert!(cell_name.is_empty(), "cells are unnamed");
                cells.push(value);
                next = end;
            }
            assert_eq!(next, payload.len());
            Value::Cell { rows, cols, cells }
        }
        other => panic!("unexpected array class {}", other),
    };

    (name, value)
}

/// Decode every top-level variable of a MAT-file image.
pub fn parse(bytes: &[u8]) -> Vec<Variable> {
    assert!(bytes.len() >= 128, "file shorter than header");
    assert_eq!(&bytes[124..126], &[0x00, 0x01]);
    assert_eq!(&bytes[126..128], b"IM");

    let mut offset = 128;
    let mut variables = Vec::new();
    while offset < bytes.len() {
        let (ty, payload, next) = element(bytes, offset);
        assert_eq!(ty, 14, "top-level elements must be miMATRIX");
        assert_eq!(
            next - offset,
            8 + payload.len(),
            "containers need no padding"
        );
        let (name, value) = matrix(payload);
        variables.push(Variable {
            name,
            value,
            declared_len: payload.len(),
        });
        offset = next;
    }
    assert_eq!(offset, bytes.len(), "trailing bytes after last element");
    variables
}

pub fn parse_file(path: &Path) -> Vec<Variable> {
    parse(&read_bytes(path))
}
