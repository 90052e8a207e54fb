/// Split `text` on runs of whitespace. Empty or blank input yields no tokens.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::tokenize;

    #[test]
    fn splits_on_whitespace_runs() {
        assert_eq!(tokenize("  ALL\tnotebook \n 07/01/2020 "), vec!["ALL", "notebook", "07/01/2020"]);
    }

    #[test]
    fn empty_input_has_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t\n").is_empty());
    }
}
