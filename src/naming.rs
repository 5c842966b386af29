use heck::ToSnakeCase;

const UNCOUNTABLE: &[&str] = &[
    "data",
    "deer",
    "equipment",
    "feedback",
    "fish",
    "information",
    "metadata",
    "money",
    "news",
    "rice",
    "series",
    "sheep",
    "species",
    "staff",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("tooth", "teeth"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("mouse", "mice"),
    ("ox", "oxen"),
    ("criterion", "criteria"),
    ("datum", "data"),
    ("index", "indices"),
    ("matrix", "matrices"),
    ("vertex", "vertices"),
    ("analysis", "analyses"),
    ("axis", "axes"),
    ("crisis", "crises"),
    ("thesis", "theses"),
    ("cactus", "cacti"),
    ("radius", "radii"),
    ("quiz", "quizzes"),
];

const F_TO_VES: &[&str] = &[
    "calf", "elf", "half", "knife", "leaf", "life", "loaf", "self", "shelf", "thief", "wife",
    "wolf",
];

const O_TO_OES: &[&str] = &[
    "echo", "hero", "potato", "tomato", "torpedo", "veto",
];

/// Plural of the last word of `name`, in the input's casing. Names that are
/// already plural come back unchanged.
pub fn pluralize(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    let split = last_word_start(name);
    let (prefix, word) = name.split_at(split);
    format!("{prefix}{}", pluralize_word(word))
}

fn pluralize_word(word: &str) -> String {
    let lower = word.to_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        return match_case(word, plural);
    }
    if is_plural(&lower) {
        return word.to_string();
    }
    if let Some(stem) = lower.strip_suffix("fe").filter(|_| F_TO_VES.contains(&lower.as_str())) {
        return match_case(word, &format!("{stem}ves"));
    }
    if let Some(stem) = lower.strip_suffix('f').filter(|_| F_TO_VES.contains(&lower.as_str())) {
        return match_case(word, &format!("{stem}ves"));
    }
    if O_TO_OES.contains(&lower.as_str()) {
        return match_case(word, &format!("{lower}es"));
    }
    if let Some(stem) = lower.strip_suffix('y')
        && stem.chars().last().is_some_and(|c| !is_vowel(c))
    {
        return match_case(word, &format!("{stem}ies"));
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|end| lower.ends_with(end)) {
        return match_case(word, &format!("{lower}es"));
    }
    match_case(word, &format!("{lower}s"))
}

/// Irregular plurals and `-s` endings that are not themselves singular
/// endings (`-ss`, `-us`, `-is`, `-as`).
fn is_plural(lower: &str) -> bool {
    if IRREGULAR.iter().any(|(_, plural)| *plural == lower) {
        return true;
    }
    lower.ends_with('s') && !["ss", "us", "is", "as"].iter().any(|end| lower.ends_with(end))
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Byte offset where the last word of an identifier begins.
fn last_word_start(name: &str) -> usize {
    let words = name.to_snake_case();
    let Some(last) = words.rsplit('_').find(|w| !w.is_empty()) else {
        return 0;
    };
    // `to_snake_case` only lowercases and inserts separators, so the last word
    // appears case-insensitively at the end of the original input.
    let lower = name.to_lowercase();
    if lower.len() == name.len() && lower.ends_with(last) {
        name.len() - last.len()
    } else {
        0
    }
}

/// Re-applies the casing pattern of `original` to `plural`.
fn match_case(original: &str, plural: &str) -> String {
    let has_lower = original.chars().any(|c| c.is_lowercase());
    let has_upper = original.chars().any(|c| c.is_uppercase());
    if has_upper && !has_lower && original.chars().count() > 1 {
        return plural.to_uppercase();
    }
    let mut chars = original.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => {
            let mut out = String::with_capacity(plural.len());
            let mut rest = plural.chars();
            if let Some(head) = rest.next() {
                out.extend(head.to_uppercase());
            }
            out.extend(rest);
            out
        }
        _ => plural.to_string(),
    }
}
