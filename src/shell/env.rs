//! Environment variables
//!
//! A small ordered variable store with `$VAR` / `${VAR}` expansion, used for
//! the prompt and by `echo`.

use indexmap::IndexMap;

#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: IndexMap<String, String>,
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Valid variable (and alias) name: letters, digits, `_`, `-`, `.`; not empty.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| is_name_char(c) || c == '-' || c == '.')
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_string(), value.to_string());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.vars.shift_remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Replace `$NAME` and `${NAME}`; unknown variables expand to nothing.
    pub fn expand(&self, text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len());
        let mut i = 0;

        while i < chars.len() {
            if chars[i] != '$' || i + 1 >= chars.len() {
                out.push(chars[i]);
                i += 1;
                continue;
            }

            if chars[i + 1] == '{' {
                if let Some(close) = chars[i + 2..].iter().position(|&c| c == '}') {
                    let name: String = chars[i + 2..i + 2 + close].iter().collect();
                    out.push_str(self.get(&name).unwrap_or(""));
                    i += close + 3;
                    continue;
                }
                out.push('$');
                i += 1;
                continue;
            }

            let len = chars[i + 1..].iter().take_while(|&&c| is_name_char(c)).count();
            if len == 0 {
                out.push('$');
                i += 1;
                continue;
            }
            let name: String = chars[i + 1..i + 1 + len].iter().collect();
            out.push_str(self.get(&name).unwrap_or(""));
            i += len + 1;
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand() {
        let mut env = Environment::new();
        env.set("USER", "ada");
        env.set("HOME", "/home/ada");
        assert_eq!(env.expand("hi $USER"), "hi ada");
        assert_eq!(env.expand("${HOME}/docs"), "/home/ada/docs");
        assert_eq!(env.expand("$MISSING!"), "!");
        assert_eq!(env.expand("cost: 5$"), "cost: 5$");
        assert_eq!(env.expand("$ {x}"), "$ {x}");
        assert_eq!(env.expand("${open"), "${open");
    }

    #[test]
    fn test_set_remove_order() {
        let mut env = Environment::new();
        env.set("B", "2");
        env.set("A", "1");
        assert_eq!(env.iter().map(|(k, _)| k).collect::<Vec<_>>(), vec!["B", "A"]);
        assert_eq!(env.remove("B").as_deref(), Some("2"));
        assert!(env.get("B").is_none());
    }

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("ll"));
        assert!(is_valid_name("git-st"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("a b"));
        assert!(!is_valid_name("a/b"));
    }
}
