// SPDX-License-Identifier: GPL-3.0-or-later
pub mod aggregate;
pub mod catalog;
pub mod conversion;
pub mod equivalence;
pub mod identifier_matching;
pub mod import;
pub mod normalize;
pub mod reconcile;
pub mod report;
pub mod text_matching;

#[cfg(test)]
mod test_support;

pub use aggregate::{count_by_result, count_by_search_method, format_counts};
pub use catalog::{PlaylistLibrary, SongCatalog, SongSearch};
pub use conversion::{ConversionError, ConversionResult, PlaylistConverter};
pub use equivalence::EquivalenceResolver;
pub use identifier_matching::{IdentifierMatcher, IdentifierRule};
pub use import::{playlist_display_name, read_track_queries, ImportError, CSV_FORMAT_HINT};
pub use normalize::{normalize, strip_apostrophes};
pub use reconcile::{AddOutcome, PlaylistReconciler};
pub use report::{failure_entries, write_failure_log, write_json_results, ReportError};
pub use text_matching::{TextMatch, TextMatcher, TextRule};
