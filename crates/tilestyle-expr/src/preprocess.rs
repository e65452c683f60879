pub const VARIABLE_PREFIX: &str = "czm_";
pub const BACKSLASH_SENTINEL: &str = "@#%";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PreprocessError {
    #[error("unmatched `${{` at {pos}")]
    UnmatchedPlaceholder { pos: usize },
}

pub fn remove_backslashes(input: &str) -> String {
    input.replace('\\', BACKSLASH_SENTINEL)
}

pub fn restore_backslashes(input: &str) -> String {
    input.replace(BACKSLASH_SENTINEL, "\\")
}

/// Rewrites every `${Name}` outside of quoted literals into `czm_Name`.
pub fn replace_variables(input: &str) -> Result<String, PreprocessError> {
    let mut out = String::with_capacity(input.len());
    let mut cursor = 0;
    while let Some(start_offset) = input[cursor..].find("${") {
        let start = cursor + start_offset;
        let quote = first_quote(&input[cursor..]).map(|(offset, quote)| (cursor + offset, quote));

        if let Some((open, quote)) = quote.filter(|(open, _)| *open < start) {
            let close = input[open + 1..]
                .find(quote)
                .map(|offset| open + 1 + offset + 1)
                .unwrap_or(input.len());
            out.push_str(&input[cursor..close]);
            cursor = close;
            continue;
        }

        out.push_str(&input[cursor..start]);
        let name_start = start + 2;
        let Some(end_offset) = input[name_start..].find('}') else {
            return Err(PreprocessError::UnmatchedPlaceholder { pos: start });
        };
        let end = name_start + end_offset;
        out.push_str(VARIABLE_PREFIX);
        out.push_str(&input[name_start..end]);
        cursor = end + 1;
    }
    out.push_str(&input[cursor..]);
    Ok(out)
}

pub fn is_variable(identifier: &str) -> bool {
    identifier.starts_with(VARIABLE_PREFIX)
}

pub fn property_name(identifier: &str) -> &str {
    identifier
        .strip_prefix(VARIABLE_PREFIX)
        .unwrap_or(identifier)
}

fn first_quote(input: &str) -> Option<(usize, char)> {
    input.char_indices().find(|(_, ch)| *ch == '\'' || *ch == '"')
}

#[cfg(test)]
#[path = "preprocess_test.rs"]
mod tests;
