use log::trace;
use once_cell::sync::Lazy;

/// A single lexical token. `Char` is an intermediate form only; no `Char`
/// survives past [`lex`].
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Keyword(String),
    Char(String),
    Identifier(String),
    IntLiteral(i64),
    StringLiteral(String),
}

impl Token {
    pub fn is_keyword(&self, text: &str) -> bool {
        matches!(self, Token::Keyword(k) if k == text)
    }
}

/// Closed keyword set, longest-match-first. `【 】` and `“ ”` are handled as
/// dedicated delimiters in [`basic_tokenize`] rather than through this
/// table, since their *contents* must not be re-tokenized.
const KEYWORDS_RAW: &[&str] = &[
    "摆哈儿",
    "凶得很",
    "巴倒",
    "加",
    "减",
    "乘",
    "除以",
    "比",
    "大",
    "小",
    "跟倒",
    "一模一样呢",
    "不一样",
    "从",
    "拢",
    "打转转儿：",
    "转完了",
    "看哈儿",
    "啵？",
    "要是呢话",
    "不是呢话",
    "走哈儿",
    "走",
    "倒起走哈儿",
    "倒起走",
    "步",
    "啷个办：",
    "刹脚",
    "喊",
    "爬远点",
    "开始：",
    "。",
    "：",
    "，",
    "、",
    "？",
    "（",
    "）",
    "(",
    ")",
];

static KEYWORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut keywords = KEYWORDS_RAW.to_vec();
    // Longest match wins: try the longest candidates first.
    keywords.sort_by_key(|kw| std::cmp::Reverse(kw.chars().count()));
    keywords
});

const CHINESE_DIGITS: &str = "零一二三四五六七八九";

fn is_digit_char(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(c) = chars.next() else {
        return false;
    };
    if chars.next().is_some() {
        return false;
    }
    c.is_ascii_digit() || c == '十' || CHINESE_DIGITS.contains(c)
}

/// `!`/`！` are interchangeable with `。` as statement terminators.
fn normalize(input: &str) -> String {
    input
        .chars()
        .map(|c| if c == '!' || c == '！' { '。' } else { c })
        .collect()
}

fn match_keyword(chars: &[char], at: usize) -> Option<(&'static str, usize)> {
    for &kw in KEYWORDS.iter() {
        let len = kw.chars().count();
        if at + len > chars.len() {
            continue;
        }
        if chars[at..at + len].iter().copied().eq(kw.chars()) {
            return Some((kw, len));
        }
    }
    None
}

/// Pass A: strip whitespace/comments, recognize `【 】` and `“ ”`, greedily
/// match keywords, otherwise emit a single `Char`.
pub fn basic_tokenize(input: &str) -> Vec<Token> {
    let normalized = normalize(input);
    let chars: Vec<char> = normalized.chars().collect();
    let mut tokens = vec![];
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        if c == '#' {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
            continue;
        }

        if c == '【' {
            i += 1;
            let mut ident = String::new();
            while i < chars.len() && chars[i] != '】' {
                if !chars[i].is_whitespace() {
                    ident.push(chars[i]);
                }
                i += 1;
            }
            i += 1; // consume 】 (or run off the end of malformed input)
            tokens.push(Token::Identifier(ident));
            continue;
        }

        if c == '“' {
            tokens.push(Token::Keyword("“".to_owned()));
            i += 1;
            let mut contents = String::new();
            while i < chars.len() && chars[i] != '”' {
                contents.push(chars[i]);
                i += 1;
            }
            i += 1; // consume ”
            tokens.push(Token::StringLiteral(contents));
            tokens.push(Token::Keyword("”".to_owned()));
            continue;
        }

        if let Some((kw, len)) = match_keyword(&chars, i) {
            tokens.push(Token::Keyword(kw.to_owned()));
            i += len;
            continue;
        }

        tokens.push(Token::Char(c.to_string()));
        i += 1;
    }

    trace!("basic_tokenize produced {} tokens", tokens.len());
    tokens
}

fn chinese_digit_value(c: char) -> Option<i64> {
    CHINESE_DIGITS.chars().position(|d| d == c).map(|p| p as i64)
}

/// Positional convention: a lone digit is its value, `十` alone is 10,
/// `X十`/`十Y`/`X十Y` follow the obvious multiplication. Longer forms are
/// unsupported and fall through (the run is left as `Char`s, which pass C
/// will later fold into an identifier).
fn parse_chinese_run(run: &[char]) -> Option<i64> {
    match run {
        [c] if *c == '十' => Some(10),
        [c] => chinese_digit_value(*c),
        [a, b] if *a == '十' => chinese_digit_value(*b).map(|y| 10 + y),
        [a, b] if *b == '十' => chinese_digit_value(*a).map(|x| x * 10),
        [a, b, c] if *b == '十' => Some(chinese_digit_value(*a)? * 10 + chinese_digit_value(*c)?),
        _ => None,
    }
}

fn parse_digit_run(run: &[char]) -> Option<i64> {
    if run.iter().all(|c| c.is_ascii_digit()) {
        let text: String = run.iter().collect();
        return text.parse::<i64>().ok();
    }
    parse_chinese_run(run)
}

/// Pass B: collapse maximal runs of digit-valued `Char` tokens into a
/// single `IntLiteral`.
pub fn fold_integers(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        let is_digit_start = matches!(&tokens[i], Token::Char(c) if is_digit_char(c));

        if is_digit_start {
            let mut j = i;
            let mut run = vec![];
            while let Some(Token::Char(c)) = tokens.get(j) {
                if !is_digit_char(c) {
                    break;
                }
                run.push(c.chars().next().expect("single-char token"));
                j += 1;
            }

            if let Some(value) = parse_digit_run(&run) {
                out.push(Token::IntLiteral(value));
                i = j;
                continue;
            }
        }

        out.push(tokens[i].clone());
        i += 1;
    }

    trace!("fold_integers produced {} tokens", out.len());
    out
}

/// Pass C: collapse any remaining maximal run of `Char` tokens into one
/// `Identifier`.
pub fn fold_identifiers(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        if matches!(&tokens[i], Token::Char(_)) {
            let mut ident = String::new();
            while let Some(Token::Char(c)) = tokens.get(i) {
                ident.push_str(c);
                i += 1;
            }
            out.push(Token::Identifier(ident));
            continue;
        }

        out.push(tokens[i].clone());
        i += 1;
    }

    trace!("fold_identifiers produced {} tokens", out.len());
    out
}

/// Runs all three lexer passes in order. Never rejects input; unrecognized
/// characters simply become identifier text.
pub fn lex(input: &str) -> Vec<Token> {
    let tokens = basic_tokenize(input);
    let tokens = fold_integers(tokens);
    fold_identifiers(tokens)
}
