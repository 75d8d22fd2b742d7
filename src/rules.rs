//! The "decide once, remember forever" rule cache.
//!
//! Decisions are stored as ordered (glob pattern, bool) pairs. Lookup walks
//! the pairs in insertion order and the first pattern matching an action key
//! wins, so a learned rule silences every later prompt for matching changes
//! within the run. Nothing is persisted across runs.

use std::io;
use std::path::Path;

use globset::{GlobBuilder, GlobMatcher};
use tracing::debug;

use crate::error::{Error, Result};
use crate::prompt::Prompt;
use crate::snapshot::sanitize;

const USAGE: &str = "Please answer with one of: N, Y, NA, YA";

#[derive(Debug, Clone)]
struct Rule {
    pattern: String,
    matcher: GlobMatcher,
    decision: bool,
}

/// Ordered pattern-keyed memo of prior accept/reject decisions.
#[derive(Debug, Default)]
pub struct RuleCache {
    rules: Vec<Rule>,
}

impl RuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// First-match-wins lookup against the cached patterns.
    pub fn lookup(&self, key: &str) -> Option<bool> {
        self.rules
            .iter()
            .find(|rule| rule.matcher.is_match(key))
            .map(|rule| rule.decision)
    }

    /// Append a (pattern, decision) pair. Fails only on an invalid glob.
    pub fn insert(&mut self, pattern: &str, decision: bool) -> Result<()> {
        let matcher = compile(pattern).map_err(Error::Pattern)?;
        self.rules.push(Rule {
            pattern: pattern.to_string(),
            matcher,
            decision,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Decide whether to keep the change named by `key` on `path`.
    ///
    /// A cached pattern match resolves without interaction. Otherwise the
    /// operator is asked; `Y`/`N` decide this change only, `YA`/`NA` also
    /// learn a wildcard rule. Invalid responses re-prompt indefinitely, as
    /// does a generalize pattern that fails to match the triggering key.
    /// Only an I/O failure on the prompt stream is an error.
    pub fn resolve(
        &mut self,
        path: &Path,
        key: &str,
        diff: &[String],
        prompt: &mut dyn Prompt,
    ) -> io::Result<bool> {
        if let Some(decision) = self.lookup(key) {
            debug!(key = %key, decision, "resolved by cached rule");
            return Ok(decision);
        }

        prompt.say(&format!(
            "Perform action {} on {}?\n{}",
            sanitize(key),
            sanitize(&path.display().to_string()),
            diff.join("\n")
        ))?;

        let (decision, generalize) = loop {
            match prompt.read_line()?.as_str() {
                "N" => break (false, false),
                "Y" => break (true, false),
                "NA" => break (false, true),
                "YA" => break (true, true),
                _ => prompt.say(USAGE)?,
            }
        };

        if generalize {
            let (pattern, matcher) = self.learn_pattern(key, prompt)?;
            self.rules.push(Rule {
                pattern,
                matcher,
                decision,
            });
        }
        Ok(decision)
    }

    /// Read a glob pattern from the operator, re-prompting until it both
    /// compiles and matches the key that triggered the prompt.
    fn learn_pattern(
        &self,
        key: &str,
        prompt: &mut dyn Prompt,
    ) -> io::Result<(String, GlobMatcher)> {
        prompt.say(&format!("Enter a pattern for the key: {}", sanitize(key)))?;
        loop {
            let candidate = prompt.read_line()?;
            match compile(&candidate) {
                Err(reason) => prompt.say(&format!("Invalid pattern: {reason}"))?,
                Ok(matcher) if !matcher.is_match(key) => {
                    prompt.say("Key doesn't match the pattern")?
                }
                Ok(matcher) => return Ok((candidate, matcher)),
            }
        }
    }

    /// Pattern sources in insertion order, for diagnostics.
    pub fn patterns(&self) -> impl Iterator<Item = (&str, bool)> {
        self.rules
            .iter()
            .map(|rule| (rule.pattern.as_str(), rule.decision))
    }
}

/// Case-sensitive shell-wildcard matcher; `*` matches any run of characters
/// since action keys are flat names, not paths.
fn compile(pattern: &str) -> std::result::Result<GlobMatcher, String> {
    GlobBuilder::new(pattern)
        .literal_separator(false)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompt;
    use std::path::PathBuf;

    fn resolve_with(
        cache: &mut RuleCache,
        key: &str,
        responses: &[&str],
    ) -> (bool, ScriptedPrompt) {
        let mut prompt = ScriptedPrompt::new(responses.iter().copied());
        let path = PathBuf::from("/music/a.mp3");
        let decision = cache
            .resolve(&path, key, &["TPE1. \"a\" --> None".to_string()], &mut prompt)
            .unwrap();
        (decision, prompt)
    }

    #[test]
    fn cached_pattern_resolves_without_prompting() {
        let mut cache = RuleCache::new();
        cache.insert("DeleteTag *", true).unwrap();
        let (decision, prompt) = resolve_with(&mut cache, "DeleteTag TXXX:FOO", &[]);
        assert!(decision);
        assert!(prompt.transcript.is_empty());
    }

    #[test]
    fn first_matching_pattern_wins() {
        let mut cache = RuleCache::new();
        cache.insert("DeleteTag TXXX:*", false).unwrap();
        cache.insert("DeleteTag *", true).unwrap();
        let (decision, _) = resolve_with(&mut cache, "DeleteTag TXXX:FOO", &[]);
        assert!(!decision);
        let (decision, _) = resolve_with(&mut cache, "DeleteTag TIT3", &[]);
        assert!(decision);
    }

    #[test]
    fn invalid_input_reprompts_until_recognized() {
        let mut cache = RuleCache::new();
        let (decision, prompt) =
            resolve_with(&mut cache, "FixLyrics", &["maybe", "yes", "Y"]);
        assert!(decision);
        assert!(prompt.exhausted());
        assert_eq!(
            prompt.transcript.iter().filter(|t| *t == USAGE).count(),
            2
        );
    }

    #[test]
    fn generalize_learns_a_rule_for_later_keys() {
        let mut cache = RuleCache::new();
        let (decision, _) = resolve_with(&mut cache, "DeleteTag TXXX:FOO", &["YA", "DeleteTag TXXX:*"]);
        assert!(decision);
        assert_eq!(cache.len(), 1);

        // Second key matching the learned pattern never prompts.
        let (decision, prompt) = resolve_with(&mut cache, "DeleteTag TXXX:BAR", &[]);
        assert!(decision);
        assert!(prompt.transcript.is_empty());
    }

    #[test]
    fn mismatching_generalize_pattern_reprompts() {
        let mut cache = RuleCache::new();
        let (decision, prompt) =
            resolve_with(&mut cache, "DeleteTag X", &["NA", "Y*", "DeleteTag X"]);
        assert!(!decision);
        assert!(prompt.exhausted());
        assert!(prompt
            .transcript
            .iter()
            .any(|t| t == "Key doesn't match the pattern"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn question_shows_key_path_and_diff() {
        let mut cache = RuleCache::new();
        let (_, prompt) = resolve_with(&mut cache, "DeleteTag TPE1", &["N"]);
        let question = &prompt.transcript[0];
        assert!(question.contains("DeleteTag TPE1"));
        assert!(question.contains("/music/a.mp3"));
        assert!(question.contains("TPE1. \"a\" --> None"));
    }

    #[test]
    fn prompt_eof_is_an_error() {
        let mut cache = RuleCache::new();
        let mut prompt = ScriptedPrompt::new(Vec::<String>::new());
        let err = cache
            .resolve(
                &PathBuf::from("/music/a.mp3"),
                "FixLyrics",
                &[],
                &mut prompt,
            )
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }
}
