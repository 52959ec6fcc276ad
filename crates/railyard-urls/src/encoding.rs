//! Percent-encoding for path segments.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Everything except unreserved characters is escaped, so a value can never
/// introduce a path separator or a query delimiter.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'_')
	.remove(b'.')
	.remove(b'~');

pub(crate) fn encode_segment(value: &str) -> String {
	utf8_percent_encode(value, SEGMENT).to_string()
}

pub(crate) fn decode_segment(value: &str) -> String {
	percent_decode_str(value).decode_utf8_lossy().into_owned()
}
