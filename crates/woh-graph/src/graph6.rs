//! graph6 encoding of undirected simple graphs.
//!
//! Only the structure is encoded; edge labels are dropped and decoded graphs carry
//! labels in sorted edge order.

use woh_core::errors::{ErrorInfo, WohError};

use crate::graph::Graph;

const BIAS: u8 = 63;
const LONG_MARKER: u8 = 126;

fn decode_error(code: &str, input: &str) -> WohError {
    WohError::Graph(
        ErrorInfo::new(code, "malformed graph6 string").with_context("input", input.to_string()),
    )
}

fn push_order(out: &mut Vec<u8>, n: usize) {
    if n < 63 {
        out.push(n as u8 + BIAS);
    } else if n < 258_048 {
        out.push(LONG_MARKER);
        for shift in [12, 6, 0] {
            out.push(((n >> shift) & 0x3f) as u8 + BIAS);
        }
    } else {
        out.push(LONG_MARKER);
        out.push(LONG_MARKER);
        for shift in [30, 24, 18, 12, 6, 0] {
            out.push(((n >> shift) & 0x3f) as u8 + BIAS);
        }
    }
}

/// Encodes `graph` as a graph6 string.
pub fn encode(graph: &Graph) -> String {
    let n = graph.order();
    let mut out = Vec::new();
    push_order(&mut out, n);
    // Upper triangle, column by column: (0,1), (0,2), (1,2), (0,3), ...
    let bit_count = n * n.saturating_sub(1) / 2;
    let mut bits = vec![false; bit_count];
    for edge in graph.edges() {
        bits[edge.v * (edge.v - 1) / 2 + edge.u] = true;
    }
    for chunk in bits.chunks(6) {
        let mut value = 0u8;
        for (offset, &bit) in chunk.iter().enumerate() {
            if bit {
                value |= 1 << (5 - offset);
            }
        }
        out.push(value + BIAS);
    }
    out.into_iter().map(char::from).collect()
}

fn read_order(bytes: &[u8], input: &str) -> Result<(usize, usize), WohError> {
    let sextet = |b: u8| -> Result<usize, WohError> {
        if (BIAS..=BIAS + 63).contains(&b) {
            Ok((b - BIAS) as usize)
        } else {
            Err(decode_error("graph6-byte", input))
        }
    };
    match bytes {
        [LONG_MARKER, LONG_MARKER, rest @ ..] if rest.len() >= 6 => {
            let mut n = 0;
            for &b in &rest[..6] {
                n = (n << 6) | sextet(b)?;
            }
            Ok((n, 8))
        }
        [LONG_MARKER, rest @ ..] if rest.len() >= 3 => {
            let mut n = 0;
            for &b in &rest[..3] {
                n = (n << 6) | sextet(b)?;
            }
            Ok((n, 4))
        }
        [first, ..] if *first != LONG_MARKER => Ok((sextet(*first)?, 1)),
        _ => Err(decode_error("graph6-header", input)),
    }
}

/// Decodes a graph6 string.
pub fn decode(input: &str) -> Result<Graph, WohError> {
    let bytes = input.trim_end().as_bytes();
    let (n, header) = read_order(bytes, input)?;
    let body = &bytes[header..];
    let bit_count = n * n.saturating_sub(1) / 2;
    if body.len() != bit_count.div_ceil(6) {
        return Err(decode_error("graph6-length", input));
    }
    let mut edges = Vec::new();
    let mut index = 0;
    for v in 1..n {
        for u in 0..v {
            let byte = body[index / 6];
            if !(BIAS..=BIAS + 63).contains(&byte) {
                return Err(decode_error("graph6-byte", input));
            }
            if ((byte - BIAS) >> (5 - index % 6)) & 1 == 1 {
                edges.push((u, v));
            }
            index += 1;
        }
    }
    Graph::from_edges(n, edges)
}
