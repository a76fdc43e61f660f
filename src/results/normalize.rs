// Text and number normalization for the official results files.
//
// The files mix upper-case accent-stripped names, accented names, numbers
// serialized as strings with stray spaces, and comma decimal separators.
// Everything downstream compares and displays through these helpers.

/// Placeholder for any name the file does not carry.
pub const UNAVAILABLE: &str = "No disponible";

// Official spellings that differ between files and years.
static PARTY_ALIASES: [(&str, &str); 4] = [
    ("PARTIDO CABILDO ABIERTO", "Cabildo Abierto"),
    ("CABILDO ABIERTO", "Cabildo Abierto"),
    ("PARTIDO ASAMBLEA POPULAR", "Asamblea Popular"),
    ("ASAMBLEA POPULAR", "Asamblea Popular"),
];

// Display names of the 19 departments, keyed by simplified form.
static DISPLAY_DEPARTMENTS: [(&str, &str); 19] = [
    ("ARTIGAS", "Artigas"),
    ("CANELONES", "Canelones"),
    ("CERRO LARGO", "Cerro Largo"),
    ("COLONIA", "Colonia"),
    ("DURAZNO", "Durazno"),
    ("FLORES", "Flores"),
    ("FLORIDA", "Florida"),
    ("LAVALLEJA", "Lavalleja"),
    ("MALDONADO", "Maldonado"),
    ("MONTEVIDEO", "Montevideo"),
    ("PAYSANDU", "Paysandú"),
    ("RIO NEGRO", "Río Negro"),
    ("RIVERA", "Rivera"),
    ("ROCHA", "Rocha"),
    ("SALTO", "Salto"),
    ("SAN JOSE", "San José"),
    ("SORIANO", "Soriano"),
    ("TACUAREMBO", "Tacuarembó"),
    ("TREINTA Y TRES", "Treinta y Tres"),
];

// Given names whose accents the files drop.
static ACCENTED_GIVEN_NAMES: [(&str, &str); 16] = [
    ("MARIA", "María"),
    ("JOSE", "José"),
    ("JESUS", "Jesús"),
    ("MARTIN", "Martín"),
    ("ANGEL", "Ángel"),
    ("SEBASTIAN", "Sebastián"),
    ("ANDRES", "Andrés"),
    ("RAMON", "Ramón"),
    ("CESAR", "César"),
    ("ALVARO", "Álvaro"),
    ("GERMAN", "Germán"),
    ("RAUL", "Raúl"),
    ("OSCAR", "Óscar"),
    ("JOAQUIN", "Joaquín"),
    ("NICOLAS", "Nicolás"),
    ("VERONICA", "Verónica"),
];

// Connectors that stay lowercase inside a name.
static LOWERCASE_CONNECTORS: [&str; 10] = ["de", "del", "la", "las", "los", "y", "e", "a", "en", "el"];

// Customary colors of the established parties.
static PARTY_COLORS: [(&str, &str); 16] = [
    ("Frente Amplio", "#3366CC"),
    ("Partido Nacional", "#46C2FC"),
    ("Partido Colorado", "#FF4136"),
    ("Cabildo Abierto", "#FFD700"),
    ("Partido Independiente", "#673AB7"),
    ("Partido de la Gente", "#58E75F"),
    ("Asamblea Popular", "#5E100C"),
    ("Partido Ecologista Radical Intransigente", "#0C5C02"),
    ("Partido Verde Animalista", "#6B946B"),
    ("Concertacion", "#FFC0CB"),
    ("Coalicion Republicana", "#FFC0CB"),
    ("Unidad Popular", "#5E100C"),
    ("Partido Digital", "#FFA500"),
    ("Partido Constitucional Ambientalista", "#EEFFC0"),
    ("Avanzar Republicano", "#C0FBFF"),
    ("Otros", "#AAAAAA"),
];

const UNAVAILABLE_COLOR: &str = "#CCCCCC";

/// Canonical comparison form: upper case, accents folded, only
/// alphanumerics and single spaces. "Frente Amplio" -> "FRENTE AMPLIO".
pub fn simplify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        let folded = fold_accent(c).to_ascii_uppercase();
        if folded.is_ascii_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(folded);
        } else if folded.is_whitespace() {
            pending_space = true;
        }
    }
    out
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'Á' | 'À' | 'Ä' | 'Â' => 'a',
        'é' | 'è' | 'ë' | 'ê' | 'É' | 'È' | 'Ë' | 'Ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' | 'Í' | 'Ì' | 'Ï' | 'Î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'Ó' | 'Ò' | 'Ö' | 'Ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' | 'Ú' | 'Ù' | 'Ü' | 'Û' => 'u',
        'ñ' | 'Ñ' => 'n',
        _ => c,
    }
}

/// The official label of a party, from the alias table when the file uses
/// a variant spelling, otherwise the title-cased raw name.
pub fn canonical_party(raw: &str) -> String {
    let key = simplify(raw);
    for (alias, official) in PARTY_ALIASES.iter() {
        if *alias == key {
            return official.to_string();
        }
    }
    title_case(raw)
}

/// The accented display name of a department. Unknown names are
/// title-cased as-is.
pub fn display_department(raw: &str) -> String {
    let key = simplify(raw);
    for (simple, display) in DISPLAY_DEPARTMENTS.iter() {
        if *simple == key {
            return display.to_string();
        }
    }
    title_case(raw)
}

/// True when two names are the same once simplified.
pub fn names_match(a: &str, b: &str) -> bool {
    simplify(a) == simplify(b)
}

/// The display color of a party. Parties without a customary color get a
/// stable one derived from their name, so reruns agree.
pub fn party_color(party: &str) -> String {
    if party == UNAVAILABLE {
        return UNAVAILABLE_COLOR.to_string();
    }
    let key = simplify(party);
    for (name, color) in PARTY_COLORS.iter() {
        if simplify(name) == key {
            return color.to_string();
        }
    }
    // FNV-1a over the simplified name, folded down to a 24-bit color.
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for b in key.bytes() {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    format!("#{:06X}", (hash ^ (hash >> 24)) & 0x00FF_FFFF)
}

/// Formats a candidate name from the raw file form:
/// keeps only the first candidate when several are glued together,
/// capitalizes each word, restores accents on common given names and
/// keeps connectors lowercase. Formatting is idempotent.
pub fn format_candidate_name(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() || raw == UNAVAILABLE {
        return UNAVAILABLE.to_string();
    }

    // "NOM1/NOM2", "NOM1 y NOM2", "NOM1-NOM2", "NOM1, NOM2", "NOM1 (NOM2":
    // keep the part before the earliest separator.
    let mut end = raw.len();
    for sep in ["/", "-", ",", "("] {
        if let Some(idx) = raw.find(sep) {
            end = end.min(idx);
        }
    }
    for sep in [" y ", " Y "] {
        if let Some(idx) = raw.find(sep) {
            end = end.min(idx);
        }
    }
    let head = raw[..end].trim();
    if head.is_empty() {
        return UNAVAILABLE.to_string();
    }

    let mut words: Vec<String> = Vec::new();
    for (idx, word) in head.split_whitespace().enumerate() {
        let key = simplify(word);
        let accented = ACCENTED_GIVEN_NAMES
            .iter()
            .find(|(plain, _)| *plain == key)
            .map(|(_, accented)| accented.to_string());
        let lower = word.to_lowercase();
        let formatted = if let Some(accented) = accented {
            accented
        } else if idx > 0 && LOWERCASE_CONNECTORS.contains(&lower.as_str()) {
            lower
        } else {
            capitalize_word(&lower)
        };
        words.push(formatted);
    }
    words.join(" ")
}

// First letter of each apostrophe-separated part upper-cased: "o'brien"
// -> "O'Brien".
fn capitalize_word(lower: &str) -> String {
    lower
        .split('\'')
        .map(|part| {
            let mut cs = part.chars();
            match cs.next() {
                Some(first) => first.to_uppercase().collect::<String>() + cs.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join("'")
}

fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|w| capitalize_word(&w.to_lowercase()))
        .collect::<Vec<String>>()
        .join(" ")
}

/// Safe conversion of a count field: trims stray spaces, accepts comma
/// decimal separators, malformed input counts as 0.
pub fn parse_count(raw: &str) -> u64 {
    let cleaned = raw.trim().replace(',', ".");
    if cleaned.is_empty() {
        return 0;
    }
    if let Ok(n) = cleaned.parse::<u64>() {
        return n;
    }
    match cleaned.parse::<f64>() {
        Ok(f) if f >= 0.0 => f as u64,
        _ => 0,
    }
}

/// Rounds to one decimal, the precision of the departmental tables.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Rounds to two decimals, the precision of the national aggregates.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Safe conversion of a percentage field, same policy as [`parse_count`].
pub fn parse_percent(raw: &str) -> f64 {
    let cleaned = raw.trim().replace(',', ".");
    if cleaned.is_empty() {
        return 0.0;
    }
    cleaned.parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simplify_strips_accents_and_case() {
        assert_eq!(simplify("Frente Amplio"), "FRENTE AMPLIO");
        assert_eq!(simplify("Paysandú"), "PAYSANDU");
        assert_eq!(simplify("RÌO NEGRO"), "RIO NEGRO");
        assert_eq!(simplify("  Treinta   y  Tres "), "TREINTA Y TRES");
        assert_eq!(simplify("San José (este)"), "SAN JOSE ESTE");
    }

    #[test]
    fn canonical_party_applies_aliases() {
        assert_eq!(canonical_party("PARTIDO CABILDO ABIERTO"), "Cabildo Abierto");
        assert_eq!(canonical_party("Cabildo Abierto"), "Cabildo Abierto");
        assert_eq!(canonical_party("FRENTE AMPLIO"), "Frente Amplio");
        assert_eq!(canonical_party("Partido Nacional"), "Partido Nacional");
    }

    #[test]
    fn department_display_names() {
        assert_eq!(display_department("PAYSANDU"), "Paysandú");
        assert_eq!(display_department("RÍO NEGRO"), "Río Negro");
        assert_eq!(display_department("TREINTA Y TRES"), "Treinta y Tres");
        assert_eq!(display_department("VILLA NUEVA"), "Villa Nueva");
    }

    #[test]
    fn candidate_names_are_formatted() {
        assert_eq!(format_candidate_name("CARLOS ENCISO"), "Carlos Enciso");
        assert_eq!(
            format_candidate_name("MARIA DE LOS ANGELES"),
            "María de los Ángeles"
        );
        assert_eq!(format_candidate_name("JOSE LUIS FALERO"), "José Luis Falero");
        assert_eq!(format_candidate_name("ANA PEREZ Y JUAN SOSA"), "Ana Perez");
        assert_eq!(format_candidate_name("ANA PEREZ/JUAN SOSA"), "Ana Perez");
        assert_eq!(format_candidate_name("ANA PEREZ (SUPLENTE)"), "Ana Perez");
        assert_eq!(format_candidate_name("LUCIA O'NEILL"), "Lucia O'Neill");
    }

    #[test]
    fn candidate_formatting_is_idempotent() {
        let samples = [
            "CARLOS ENCISO",
            "MARIA DE LOS ANGELES",
            "JOSE LUIS FALERO",
            "Yamandú Orsi",
            "",
            "No disponible",
        ];
        for s in samples {
            let once = format_candidate_name(s);
            assert_eq!(format_candidate_name(&once), once, "input: {:?}", s);
        }
    }

    #[test]
    fn missing_names_fall_back_to_the_placeholder() {
        assert_eq!(format_candidate_name(""), UNAVAILABLE);
        assert_eq!(format_candidate_name("   "), UNAVAILABLE);
        assert_eq!(format_candidate_name(UNAVAILABLE), UNAVAILABLE);
    }

    #[test]
    fn counts_are_parsed_defensively() {
        assert_eq!(parse_count("1234"), 1234);
        assert_eq!(parse_count(" 1234 "), 1234);
        assert_eq!(parse_count("12,5"), 12);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("n/a"), 0);
        assert_eq!(parse_count("-3"), 0);
    }

    #[test]
    fn party_colors_are_stable() {
        assert_eq!(party_color("Frente Amplio"), "#3366CC");
        assert_eq!(party_color("FRENTE AMPLIO"), "#3366CC");
        assert_eq!(party_color(UNAVAILABLE), "#CCCCCC");
        let unknown = party_color("Partido Nuevo");
        assert_eq!(unknown, party_color("Partido Nuevo"));
        assert_eq!(unknown.len(), 7);
        assert!(unknown.starts_with('#'));
    }

    #[test]
    fn percentages_are_parsed_defensively() {
        assert_eq!(parse_percent("55,3"), 55.3);
        assert_eq!(parse_percent(" 8.25 "), 8.25);
        assert_eq!(parse_percent(""), 0.0);
        assert_eq!(parse_percent("x"), 0.0);
    }
}
