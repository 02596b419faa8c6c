//! Reading byte arrays back out of generated C headers.

use alloc::{format, string::String, vec::Vec};
use snafu::{OptionExt, ResultExt, Snafu};

#[derive(Debug, Snafu)]
pub enum ExtractError {
    #[snafu(display("No array named `{name}` found"))]
    ArrayNotFound { name: String },
    #[snafu(display("Array `{name}` is missing its closing brace"))]
    UnterminatedArray { name: String },
    #[snafu(display("Invalid byte literal `{literal}` in array `{name}`"))]
    InvalidLiteral {
        name: String,
        literal: String,
        source: core::num::ParseIntError,
    },
}

/// Finds `name[...] = { ... }` and returns the body between the braces.
fn array_body<'t>(text: &'t str, name: &str) -> Result<Option<&'t str>, ExtractError> {
    if name.is_empty() {
        return Ok(None);
    }

    let mut search = text;

    while let Some(pos) = search.find(name) {
        let before = &search[..pos];
        let after = &search[pos + name.len()..];
        search = after;

        // whole identifier only
        let bounded_left = !before.ends_with(|c: char| c.is_ascii_alphanumeric() || c == '_');
        let Some(rest) = after.trim_start().strip_prefix('[') else {
            continue;
        };
        if !bounded_left {
            continue;
        }

        let Some((_, rest)) = rest.split_once(']') else {
            continue;
        };
        let Some(rest) = rest.trim_start().strip_prefix('=') else {
            continue;
        };
        let Some(body) = rest.trim_start().strip_prefix('{') else {
            continue;
        };

        let (body, _) = body
            .split_once('}')
            .context(UnterminatedArraySnafu { name })?;
        return Ok(Some(body));
    }

    Ok(None)
}

fn parse_body(name: &str, body: &str) -> Result<Vec<u8>, ExtractError> {
    body.split(',')
        .map(str::trim)
        .filter(|literal| !literal.is_empty())
        .map(|literal| {
            let parsed = match literal
                .strip_prefix("0x")
                .or_else(|| literal.strip_prefix("0X"))
            {
                Some(hex) => u8::from_str_radix(hex, 16),
                None => literal.parse::<u8>(),
            };
            parsed.context(InvalidLiteralSnafu { name, literal })
        })
        .collect()
}

/// Bytes of the array declared as `name`.
pub fn extract_array(text: &str, name: &str) -> Result<Vec<u8>, ExtractError> {
    let body = array_body(text, name)?.context(ArrayNotFoundSnafu { name })?;
    parse_body(name, body)
}

/// Bytes of a bitmap header named `name`: the `<name>_data` array, or all `<name>_bank<i>`
/// arrays concatenated in bank order.
pub fn extract_image(text: &str, name: &str) -> Result<Vec<u8>, ExtractError> {
    let data_name = format!("{name}_data");
    if let Some(body) = array_body(text, &data_name)? {
        return parse_body(&data_name, body);
    }

    let mut bytes = Vec::new();
    for bank in 0.. {
        let bank_name = format!("{name}_bank{bank}");
        let Some(body) = array_body(text, &bank_name)? else {
            break;
        };
        bytes.extend(parse_body(&bank_name, body)?);

        if bank == 0 {
            log::debug!("reading banked image `{name}`");
        }
    }

    if bytes.is_empty() {
        return ArrayNotFoundSnafu { name: data_name }.fail();
    }

    Ok(bytes)
}
