//! Table-name inference helpers

/// Irregular nouns that the suffix rules get wrong.
const IRREGULAR: &[(&str, &str)] = &[
	("person", "people"),
	("child", "children"),
	("man", "men"),
	("woman", "women"),
	("mouse", "mice"),
	("goose", "geese"),
	("tooth", "teeth"),
	("foot", "feet"),
];

/// Words whose singular and plural forms are identical.
const UNCOUNTABLE: &[&str] = &["data", "info", "media", "series", "sheep", "fish"];

/// Pluralize the last `_`-separated segment of a snake_case word.
pub fn pluralize(word: &str) -> String {
	let (prefix, last) = match word.rfind('_') {
		Some(index) => (&word[..=index], &word[index + 1..]),
		None => ("", word),
	};
	format!("{}{}", prefix, pluralize_word(last))
}

fn pluralize_word(word: &str) -> String {
	if word.is_empty() || UNCOUNTABLE.contains(&word) {
		return word.to_string();
	}
	if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == word) {
		return (*plural).to_string();
	}
	if let Some(stem) = word.strip_suffix('y') {
		let before = stem.chars().last();
		if before.is_some_and(|c| !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')) {
			return format!("{}ies", stem);
		}
	}
	if word.ends_with('s')
		|| word.ends_with('x')
		|| word.ends_with('z')
		|| word.ends_with("ch")
		|| word.ends_with("sh")
	{
		return format!("{}es", word);
	}
	if let Some(stem) = word.strip_suffix("fe") {
		return format!("{}ves", stem);
	}
	if let Some(stem) = word.strip_suffix('f') {
		return format!("{}ves", stem);
	}
	format!("{}s", word)
}

/// CamelCase type name to snake_case.
pub fn snake_case(name: &str) -> String {
	let mut out = String::with_capacity(name.len() + 4);
	for (index, ch) in name.chars().enumerate() {
		if ch.is_uppercase() {
			if index > 0 {
				out.push('_');
			}
			out.extend(ch.to_lowercase());
		} else {
			out.push(ch);
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("user", "users")]
	#[case("category", "categories")]
	#[case("day", "days")]
	#[case("box", "boxes")]
	#[case("bus", "buses")]
	#[case("match", "matches")]
	#[case("dish", "dishes")]
	#[case("leaf", "leaves")]
	#[case("knife", "knives")]
	#[case("person", "people")]
	#[case("child", "children")]
	#[case("sheep", "sheep")]
	#[case("blog_post", "blog_posts")]
	#[case("sales_person", "sales_people")]
	fn test_pluralize(#[case] singular: &str, #[case] plural: &str) {
		assert_eq!(pluralize(singular), plural);
	}

	#[rstest]
	#[case("User", "user")]
	#[case("BlogPost", "blog_post")]
	#[case("HTTPLog", "h_t_t_p_log")]
	fn test_snake_case(#[case] name: &str, #[case] expected: &str) {
		assert_eq!(snake_case(name), expected);
	}
}
