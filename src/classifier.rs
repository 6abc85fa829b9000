//! Deterministic fast-path classifier.
//!
//! A pure, ordered rule list that resolves the common, unambiguous
//! Hindi/Hinglish/English phrasings without touching the generative
//! fallback. Any ambiguity returns `None` and defers: a wrong deterministic
//! classification is worse than paying for the fallback call.

use crate::intent::{ResolvedIntent, TransactionDraft};

const GREETING_TOKENS: &[&str] = &[
    "hi", "hello", "hey", "namaste", "namaskar", "help", "madad", "/start", "/help",
];
const TODAY_TOKENS: &[&str] = &["aaj", "today"];
const SALE_TOKENS: &[&str] = &["sale", "sales", "bikri", "biki", "becha", "bechi", "sold"];
const WEEK_TOKENS: &[&str] = &["week", "weekly", "hafta", "hafte", "saptah"];
const SUMMARY_TOKENS: &[&str] = &["summary", "report", "aankde", "hisab", "hisaab"];
const CREDIT_TOKENS: &[&str] = &["udhar", "udhaar", "credit"];
const REPAYMENT_TOKENS: &[&str] = &["wapas", "vapas", "payment", "jama", "return"];
const FULL_TOKENS: &[&str] = &["sara", "saara", "poora", "pura", "full"];
const SETTLE_TOKENS: &[&str] = &["wapas", "vapas", "diya", "diye", "payment", "chukaya"];
const BALANCE_QUERY_TOKENS: &[&str] = &["kitna", "kitne", "balance", "baki", "baaki"];
const CURRENCY_WORDS: &[&str] = &["rs", "rupees", "rupaye", "rupee", "inr", "₹"];

// Grammar particles and verbs that must never be mistaken for a person name.
const GRAMMAR_TOKENS: &[&str] = &[
    "ne", "ko", "ka", "ki", "ke", "se", "me", "mein", "from", "hai", "hain", "ho", "hua", "hui",
    "gaya", "gayi", "kiya", "kiye", "diya", "diye", "liya", "liye", "aur", "the", "and", "what",
    "can", "you", "do", "kaisa", "kaisi", "is", "us", "my", "mera", "meri", "total",
];

type Rule = fn(&Utterance) -> Option<ResolvedIntent>;

/// Ordered matcher strategies; first hit wins. The guards keep the rules
/// mutually exclusive, so the order encodes precedence, not correctness.
const RULES: [Rule; 8] = [
    greeting,
    today_sales_query,
    week_summary_query,
    full_repayment,
    credit_balance_query,
    repayment,
    credit_given,
    plain_sale,
];

/// Attempts to resolve `text` without the generative fallback. `None` means
/// "defer". Pure and deterministic: the same input always yields the same
/// answer.
pub fn classify(text: &str) -> Option<ResolvedIntent> {
    let utterance = Utterance::parse(text);
    if utterance.tokens.is_empty() {
        return None;
    }
    RULES.iter().find_map(|rule| rule(&utterance))
}

/// Normalized view of one message: lowercased tokens for matching, the
/// original-cased tokens at the same indices (so extracted names keep their
/// spelling), plus the person and amount the positional patterns found.
struct Utterance {
    tokens: Vec<String>,
    raw_tokens: Vec<String>,
    person: Option<String>,
    amount: Option<f64>,
}

impl Utterance {
    fn parse(text: &str) -> Self {
        let raw_tokens: Vec<String> = text
            .split_whitespace()
            .map(|t| t.trim_matches(EDGE_PUNCTUATION).to_string())
            .filter(|t| !t.is_empty())
            .collect();
        let tokens: Vec<String> = raw_tokens.iter().map(|t| t.to_lowercase()).collect();

        let person = extract_person(&tokens, &raw_tokens);
        let amount = extract_amount(&tokens);

        Self {
            tokens,
            raw_tokens,
            person,
            amount,
        }
    }

    fn has_any(&self, set: &[&str]) -> bool {
        self.tokens.iter().any(|t| set.contains(&t.as_str()))
    }

    fn positive_amount(&self) -> Option<f64> {
        self.amount.filter(|a| *a > 0.0)
    }

    fn draft(&self) -> TransactionDraft {
        TransactionDraft {
            person: self.person.clone(),
            amount: self.positive_amount(),
            ..TransactionDraft::default()
        }
    }
}

const EDGE_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', '"', '\'', '(', ')'];

fn is_vocabulary_token(token: &str) -> bool {
    GREETING_TOKENS.contains(&token)
        || TODAY_TOKENS.contains(&token)
        || SALE_TOKENS.contains(&token)
        || WEEK_TOKENS.contains(&token)
        || SUMMARY_TOKENS.contains(&token)
        || CREDIT_TOKENS.contains(&token)
        || REPAYMENT_TOKENS.contains(&token)
        || FULL_TOKENS.contains(&token)
        || SETTLE_TOKENS.contains(&token)
        || BALANCE_QUERY_TOKENS.contains(&token)
        || CURRENCY_WORDS.contains(&token)
        || GRAMMAR_TOKENS.contains(&token)
}

fn is_name_candidate(token: &str) -> bool {
    token.chars().count() > 1
        && token.chars().all(char::is_alphabetic)
        && !is_vocabulary_token(&token.to_lowercase())
}

/// Positional person patterns: `<name> ne`, `<name> ko`, `<name> ka udhar`,
/// `from <name>`. The extracted token comes from the original-cased text.
fn extract_person(tokens: &[String], raw_tokens: &[String]) -> Option<String> {
    for (i, token) in tokens.iter().enumerate() {
        let candidate = match token.as_str() {
            "ne" | "ko" if i >= 1 => Some(&raw_tokens[i - 1]),
            "ka" if i >= 1
                && tokens
                    .get(i + 1)
                    .is_some_and(|next| CREDIT_TOKENS.contains(&next.as_str())) =>
            {
                Some(&raw_tokens[i - 1])
            }
            "from" => raw_tokens.get(i + 1),
            _ => None,
        };
        if let Some(candidate) = candidate {
            if is_name_candidate(candidate) {
                return Some(candidate.clone());
            }
        }
    }
    None
}

/// Monetary amount: a currency symbol or word leading (or glued to) a
/// decimal number. Bare numbers are deliberately not treated as amounts.
fn extract_amount(tokens: &[String]) -> Option<f64> {
    for (i, token) in tokens.iter().enumerate() {
        if let Some(rest) = token.strip_prefix('₹') {
            if let Some(value) = parse_number(rest) {
                return Some(value);
            }
        }
        if let Some(rest) = token.strip_prefix("rs") {
            if rest.starts_with(|c: char| c.is_ascii_digit()) {
                if let Some(value) = parse_number(rest) {
                    return Some(value);
                }
            }
        }
        if CURRENCY_WORDS.contains(&token.as_str()) {
            if let Some(next) = tokens.get(i + 1) {
                if let Some(value) = parse_number(next) {
                    return Some(value);
                }
            }
        }
    }
    None
}

fn parse_number(token: &str) -> Option<f64> {
    let cleaned = token.replace(',', "");
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn greeting(utt: &Utterance) -> Option<ResolvedIntent> {
    let business_terms = utt.has_any(SALE_TOKENS)
        || utt.has_any(CREDIT_TOKENS)
        || utt.has_any(REPAYMENT_TOKENS)
        || utt.has_any(WEEK_TOKENS);
    if utt.has_any(GREETING_TOKENS) && utt.amount.is_none() && !business_terms {
        return Some(ResolvedIntent::SmallTalk);
    }
    None
}

fn today_sales_query(utt: &Utterance) -> Option<ResolvedIntent> {
    if utt.has_any(TODAY_TOKENS) && utt.has_any(SALE_TOKENS) && utt.amount.is_none() {
        return Some(ResolvedIntent::GetTodaySales);
    }
    None
}

fn week_summary_query(utt: &Utterance) -> Option<ResolvedIntent> {
    if utt.has_any(WEEK_TOKENS) && utt.has_any(SUMMARY_TOKENS) {
        return Some(ResolvedIntent::GetWeekSummary);
    }
    None
}

/// "Sara udhar wapas diya": a payment settling the whole balance. The amount
/// is left unset; the resolver fills it from the outstanding balance.
fn full_repayment(utt: &Utterance) -> Option<ResolvedIntent> {
    if utt.has_any(FULL_TOKENS) && utt.has_any(CREDIT_TOKENS) && utt.has_any(SETTLE_TOKENS) {
        let mut draft = utt.draft();
        draft.amount = None;
        return Some(ResolvedIntent::CreatePayment(draft));
    }
    None
}

fn credit_balance_query(utt: &Utterance) -> Option<ResolvedIntent> {
    let person = utt.person.clone()?;
    if !utt.has_any(CREDIT_TOKENS) {
        return None;
    }
    let bare_phrasing = utt.tokens.len() == 3
        && utt.tokens[1] == "ka"
        && CREDIT_TOKENS.contains(&utt.tokens[2].as_str());
    if utt.has_any(BALANCE_QUERY_TOKENS) || bare_phrasing {
        return Some(ResolvedIntent::GetPersonCredit {
            person: Some(person),
        });
    }
    None
}

fn repayment(utt: &Utterance) -> Option<ResolvedIntent> {
    if !utt.has_any(REPAYMENT_TOKENS) {
        return None;
    }
    if utt.positive_amount().is_some() {
        return Some(ResolvedIntent::CreatePayment(utt.draft()));
    }
    if utt.person.is_some() && utt.has_any(CREDIT_TOKENS) {
        return Some(ResolvedIntent::CreatePayment(utt.draft()));
    }
    None
}

fn credit_given(utt: &Utterance) -> Option<ResolvedIntent> {
    if utt.has_any(CREDIT_TOKENS) && utt.positive_amount().is_some() {
        return Some(ResolvedIntent::CreateCredit(utt.draft()));
    }
    None
}

fn plain_sale(utt: &Utterance) -> Option<ResolvedIntent> {
    if utt.has_any(SALE_TOKENS) && utt.positive_amount().is_some() {
        return Some(ResolvedIntent::CreateSale(utt.draft()));
    }
    None
}
