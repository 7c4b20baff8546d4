//! The `OccurrenceEmitter` turns `(range, symbol, role)` into an
//! [`Occurrence`] and appends it (or a [`SymbolInformation`]) to the
//! current [`Document`].
//!
//! The emitter is the single place that enforces the symbol well-formedness
//! invariant at the boundary where occurrences actually leave the walker:
//! a violation here is logged and the offending occurrence is dropped,
//! never propagated as a fatal error.

use crate::line_index::LineIndex;
use crate::model::{Document, Occurrence, Range, Roles, Symbol, SymbolInformation};

pub struct OccurrenceEmitter<'a> {
    line_index: &'a LineIndex,
    document: &'a mut Document,
}

impl<'a> OccurrenceEmitter<'a> {
    pub fn new(line_index: &'a LineIndex, document: &'a mut Document) -> OccurrenceEmitter<'a> {
        OccurrenceEmitter {
            line_index,
            document,
        }
    }

    /// Emits an occurrence for a byte range `[start, end)`, encoded as
    /// single-line when both endpoints share a line.
    pub fn emit(&mut self, start: u32, end: u32, symbol: Symbol, roles: Roles) {
        if end < start {
            log::warn!(
                "dropping occurrence with negative length ({start}..{end}) for symbol {symbol}"
            );
            return;
        }
        if symbol.as_str().trim() != symbol.as_str() {
            log::warn!("dropping occurrence with malformed symbol {symbol:?}");
            return;
        }

        let (start_line, start_col) = self.line_index.line_col(start);
        let (end_line, end_col) = self.line_index.line_col(end);
        let range = if start_line == end_line {
            Range::single_line(start_line, start_col, end_col)
        } else {
            Range::MultiLine {
                start_line,
                start_col,
                end_line,
                end_col,
            }
        };

        self.document.occurrences.push(Occurrence {
            symbol,
            roles,
            range,
        });
    }

    pub fn emit_symbol_information(&mut self, symbol: Symbol, documentation: Vec<String>) {
        if symbol.as_str().trim() != symbol.as_str() {
            log::warn!("dropping symbol information with malformed symbol {symbol:?}");
            return;
        }
        self.document.symbols.push(SymbolInformation {
            symbol,
            documentation,
        });
    }
}
