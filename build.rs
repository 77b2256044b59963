// build.rs

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

const FALLBACK_LANG: &str = "en";

fn main() {
    let lang = select_language();
    println!("cargo:rustc-env=PIER_LANG_EFFECTIVE={}", lang);

    println!("cargo:rerun-if-env-changed=PIER_LANG");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=locales/");

    let translations = load_translations(&lang);
    let macro_code = render_translation_macro(&translations);

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is always set by cargo");
    let dest_path = Path::new(&out_dir).join("translations.rs");
    fs::write(&dest_path, macro_code).expect("Failed to write generated translations.rs");
}

/// A `lang_*` cargo feature wins over `PIER_LANG`, which wins over English.
fn select_language() -> String {
    let mut active_langs: Vec<String> = env::vars()
        .filter_map(|(key, _)| {
            key.strip_prefix("CARGO_FEATURE_LANG_")
                .map(str::to_lowercase)
        })
        .collect();
    active_langs.sort();

    match active_langs.first() {
        Some(first) => {
            if active_langs.len() > 1 {
                println!(
                    "cargo:warning=Multiple language features enabled ({:?}). Using '{}'.",
                    active_langs, first
                );
            }
            first.clone()
        }
        None => env::var("PIER_LANG").unwrap_or_else(|_| FALLBACK_LANG.to_string()),
    }
}

/// Loads `locales/en.toml` and overlays the requested language on top of it,
/// so a partial translation still compiles.
fn load_translations(lang: &str) -> BTreeMap<String, String> {
    let fallback_path = format!("locales/{}.toml", FALLBACK_LANG);
    let fallback_content = fs::read_to_string(&fallback_path)
        .unwrap_or_else(|_| panic!("Failed to read fallback language file: {}", fallback_path));
    let mut translations: BTreeMap<String, String> = toml::from_str(&fallback_content)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {}", fallback_path, e));

    if lang != FALLBACK_LANG {
        let lang_path = format!("locales/{}.toml", lang);
        match fs::read_to_string(&lang_path) {
            Ok(content) => {
                let overlay: BTreeMap<String, String> = toml::from_str(&content)
                    .unwrap_or_else(|e| panic!("Failed to parse {}: {}", lang_path, e));
                translations.extend(overlay);
            }
            Err(_) => println!(
                "cargo:warning=Language file '{}' not found. Falling back to '{}'.",
                lang_path, FALLBACK_LANG
            ),
        }
    }

    translations
}

/// Generates the `t!` macro: one arm per key expanding to a string literal,
/// plus a catch-all arm that turns unknown keys into compile errors.
fn render_translation_macro(translations: &BTreeMap<String, String>) -> String {
    let mut code = String::from(
        "/// Expands a translation key to its message.\n#[macro_export]\nmacro_rules! t {\n",
    );
    for (key, value) in translations {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        code.push_str(&format!("    (\"{}\") => {{ \"{}\" }};\n", key, escaped));
    }
    code.push_str(
        "    ($key:expr) => {{ compile_error!(concat!(\"Missing translation key: \", $key)) }};\n",
    );
    code.push('}');
    code
}
