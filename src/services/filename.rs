use uuid::Uuid;

/// Base name used when nothing storage-safe survives normalization
pub const FALLBACK_BASE_NAME: &str = "documento";

const TOKEN_LEN: usize = 8;

/// Storage key for an uploaded filename, made unique with a fresh random token
pub fn storage_key(filename: &str) -> String {
    normalize_filename(filename, &random_token())
}

/// Short random hexadecimal token
pub fn random_token() -> String {
    Uuid::new_v4().simple().to_string()[..TOKEN_LEN].to_string()
}

/// Normalize `filename` into `<base>_<token>[.<ext>]` where the base only holds
/// ASCII alphanumerics, `-` and `_`. Pure given the token.
pub fn normalize_filename(filename: &str, token: &str) -> String {
    // Clients may send a full path; only the last segment names the file
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, sanitize_extension(ext)),
        _ => (name, None),
    };

    let mut base = sanitize_base(stem);
    if base.is_empty() {
        base = FALLBACK_BASE_NAME.to_string();
    }

    match extension {
        Some(ext) => format!("{}_{}.{}", base, token, ext),
        None => format!("{}_{}", base, token),
    }
}

fn sanitize_base(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());

    for c in stem.chars() {
        let mapped = if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            c
        } else {
            fold_accent(c).unwrap_or('_')
        };

        // collapse runs of underscores
        if mapped == '_' && out.ends_with('_') {
            continue;
        }
        out.push(mapped);
    }

    out.trim_matches('_').to_string()
}

fn sanitize_extension(ext: &str) -> Option<String> {
    let ext: String = ext
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    (!ext.is_empty()).then_some(ext)
}

/// ASCII base letter for the accented Latin letters found in Portuguese and Spanish names
fn fold_accent(c: char) -> Option<char> {
    let folded = match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        _ => return None,
    };
    Some(folded)
}
