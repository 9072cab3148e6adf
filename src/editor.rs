use std::borrow::Cow::{self, Borrowed, Owned};

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::{Highlighter, MatchingBracketHighlighter};
use rustyline::hint::HistoryHinter;
use rustyline::validate::MatchingBracketValidator;
use rustyline::{Context, Helper, Hinter, Validator};

use crate::category::Categories;
use crate::parser::KEYWORDS;

#[derive(Helper, Hinter, Validator)]
pub(crate) struct TrackerHelper {
    pub(crate) categories: Categories,
    pub(crate) highlighter: MatchingBracketHighlighter,
    #[rustyline(Validator)]
    pub(crate) validator: MatchingBracketValidator,
    #[rustyline(Hinter)]
    pub(crate) hinter: HistoryHinter,
    pub(crate) colored_prompt: String,
}

impl TrackerHelper {
    pub(crate) fn new(categories: Categories, prompt: &str) -> TrackerHelper {
        TrackerHelper {
            categories,
            highlighter: MatchingBracketHighlighter::new(),
            validator: MatchingBracketValidator::new(),
            hinter: HistoryHinter {},
            colored_prompt: format!("\x1b[1;32m{prompt}\x1b[0m"),
        }
    }

    /// Keywords in the case the user started typing, then category names.
    /// Categories with spaces are quoted.
    fn candidates(&self, prefix: &str) -> Vec<String> {
        let lower = prefix.to_lowercase();
        let lowercase_typed = prefix.chars().any(|c| c.is_lowercase());

        let keywords = KEYWORDS.iter()
            .filter(|k| k.to_lowercase().starts_with(&lower))
            .map(|k| if lowercase_typed { k.to_lowercase() } else { k.to_string() });
        let categories = self.categories.all()
            .filter(|c| c.to_lowercase().starts_with(lower.trim_start_matches(['\'', '"'])))
            .map(|c| if c.contains(' ') { format!("'{c}'") } else { c.clone() });

        keywords.chain(categories).collect()
    }
}

impl Completer for TrackerHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = line[..pos].char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace() || *c == ',')
            .map_or(0, |(i, c)| i + c.len_utf8());
        let prefix = &line[start..pos];
        if prefix.is_empty() {
            return Ok((pos, vec![]));
        }

        let pairs = self.candidates(prefix).into_iter()
            .map(|c| Pair { display: c.clone(), replacement: c })
            .collect();
        Ok((start, pairs))
    }
}

impl Highlighter for TrackerHelper {
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        if default {
            Borrowed(&self.colored_prompt)
        } else {
            Borrowed(prompt)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned("\x1b[2m".to_owned() + hint + "\x1b[m")
    }

    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_char(&self, line: &str, pos: usize, forced: bool) -> bool {
        self.highlighter.highlight_char(line, pos, forced)
    }
}

#[cfg(test)]
mod tests {
    use crate::category::Categories;
    use crate::editor::TrackerHelper;

    #[test]
    fn test_candidates() {
        let helper = TrackerHelper::new(Categories::default(), "> ");
        assert_eq!(helper.candidates("HIS"), vec!["HISTORY"]);
        assert_eq!(helper.candidates("his"), vec!["history"]);
        assert_eq!(helper.candidates("sal"), vec!["Salary"]);
        assert_eq!(helper.candidates("'oth"), vec!["'Other Expense'", "'Other Income'"]);
        assert!(helper.candidates("zzz").is_empty());

        let both = helper.candidates("b");
        assert!(both.contains(&"browse".to_string()));
        assert!(both.contains(&"Bills".to_string()));
    }
}
