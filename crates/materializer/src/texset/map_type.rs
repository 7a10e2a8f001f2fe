//! Map types and the file-name pattern table used to classify them.

use std::fmt;

use super::resolution::Resolution;

/// Semantic role of a texture image in a physically-based material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapType {
    /// Albedo / base color.
    Color,
    /// Opacity mask.
    Alpha,
    /// Detail overlay.
    Overlay,
    /// Ambient occlusion.
    Occlusion,
    /// Height map, 8-bit.
    Displacement,
    /// Height map, 16-bit.
    Displacement16,
    /// Micro-surface roughness.
    Roughness,
    /// Metallic mask.
    Metalness,
    /// Glossiness (inverse roughness).
    Gloss,
    /// Specular reflection.
    Reflection,
    /// Bump map, 8-bit.
    Bump,
    /// Bump map, 16-bit.
    Bump16,
    /// Tangent-space normal map.
    Normal,
}

impl fmt::Display for MapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MapType::Color => "color",
            MapType::Alpha => "alpha",
            MapType::Overlay => "overlay",
            MapType::Occlusion => "occlusion",
            MapType::Displacement => "displacement",
            MapType::Displacement16 => "displacement16",
            MapType::Roughness => "roughness",
            MapType::Metalness => "metalness",
            MapType::Gloss => "gloss",
            MapType::Reflection => "reflection",
            MapType::Bump => "bump",
            MapType::Bump16 => "bump16",
            MapType::Normal => "normal",
        };
        f.write_str(name)
    }
}

/// Ordered pattern table mapping file-name tokens to map types.
///
/// The order is a pinned invariant: entries are tried top to bottom and the
/// first type with a matching token wins. Token sets are disjoint between
/// types, except that the 16-bit displacement/bump entries require the
/// trailing `16` adjacent to the token, which is what separates them from
/// their 8-bit counterparts under the boundary rule. Do not reorder.
const PATTERN_TABLE: &[(MapType, &[&str])] = &[
    (MapType::Color, &["color", "col", "albedo", "basecolor", "diffuse", "diff"]),
    (MapType::Alpha, &["alpha", "opacity"]),
    (MapType::Overlay, &["overlay"]),
    (MapType::Occlusion, &["occlusion", "ambientocclusion", "ao"]),
    (MapType::Displacement, &["displacement", "disp", "height"]),
    (MapType::Displacement16, &["displacement16", "disp16", "height16"]),
    (MapType::Roughness, &["roughness", "rough"]),
    (MapType::Metalness, &["metalness", "metallic", "metal"]),
    (MapType::Gloss, &["gloss", "glossiness"]),
    (MapType::Reflection, &["reflection", "refl", "specular", "spec"]),
    (MapType::Bump, &["bump"]),
    (MapType::Bump16, &["bump16"]),
    (MapType::Normal, &["normal", "nor", "nrm"]),
];

/// True for characters that extend a token; everything else is a boundary.
///
/// Underscores and dashes are boundaries, so `wood_color_4k` matches the
/// `color` token while `colorimeter` does not.
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Whether `base` contains `token` delimited by non-word characters or the
/// ends of the string.
fn contains_token(base: &str, token: &str) -> bool {
    let bytes = base.as_bytes();
    for (start, _) in base.match_indices(token) {
        let end = start + token.len();
        let bounded_left = start == 0 || !is_word_char(bytes[start - 1] as char);
        let bounded_right = end == bytes.len() || !is_word_char(bytes[end] as char);
        if bounded_left && bounded_right {
            return true;
        }
    }
    false
}

/// Match a lower-cased, extension-stripped base name against the pattern
/// table. First matching table entry wins.
pub fn match_map_type(base: &str) -> Option<MapType> {
    for (map_type, tokens) in PATTERN_TABLE {
        if tokens.iter().any(|token| contains_token(base, token)) {
            return Some(*map_type);
        }
    }
    None
}

/// Search a base name for a resolution token: a known digit immediately
/// followed by `k`, bounded by non-word characters (or the string edges) on
/// both sides.
///
/// The trailing boundary is required: `wood_4k` and `4k_wood` match,
/// `wood_4ktile` does not. Two variants of this rule existed historically
/// (with and without the trailing boundary); this crate pins the stricter
/// one.
pub fn find_resolution(base: &str) -> Option<Resolution> {
    let chars: Vec<char> = base.chars().collect();
    for (i, window) in chars.windows(2).enumerate() {
        let &[digit, k] = window else { continue };
        if !matches!(k, 'k' | 'K') {
            continue;
        }
        let Some(resolution) = Resolution::from_digit(digit) else {
            continue;
        };
        let bounded_left = i == 0 || !is_word_char(chars[i - 1]);
        let bounded_right = i + 2 == chars.len() || !is_word_char(chars[i + 2]);
        if bounded_left && bounded_right {
            return Some(resolution);
        }
    }
    None
}

/// Lower-case a file or archive-entry name and strip its extension, leaving
/// the base name the pattern table operates on.
pub fn base_name(entry_name: &str) -> String {
    let file_name = entry_name.rsplit(['/', '\\']).next().unwrap_or(entry_name);
    let base = match file_name.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => file_name,
    };
    base.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_boundaries() {
        assert!(contains_token("wood_color_4k", "color"));
        assert!(contains_token("color", "color"));
        assert!(contains_token("color-4k", "color"));
        assert!(!contains_token("colorimeter_4k", "color"));
        assert!(!contains_token("recolor2", "color"));
    }

    #[test]
    fn test_match_map_type() {
        assert_eq!(match_map_type("brick_wall_color_4k"), Some(MapType::Color));
        assert_eq!(match_map_type("brick_wall_rough_2k"), Some(MapType::Roughness));
        assert_eq!(match_map_type("brick_wall_nor_2k"), Some(MapType::Normal));
        assert_eq!(match_map_type("brick_wall_ao_2k"), Some(MapType::Occlusion));
        assert_eq!(match_map_type("brick_wall_metal_1k"), Some(MapType::Metalness));
        assert_eq!(match_map_type("plain_photo"), None);
    }

    #[test]
    fn test_sixteen_bit_variants() {
        // "displacement" fails its own boundary check when followed by "16",
        // which is what lets the 16-bit entry further down the table match.
        assert_eq!(match_map_type("rock_displacement_4k"), Some(MapType::Displacement));
        assert_eq!(match_map_type("rock_displacement16_4k"), Some(MapType::Displacement16));
        assert_eq!(match_map_type("rock_bump_4k"), Some(MapType::Bump));
        assert_eq!(match_map_type("rock_bump16_4k"), Some(MapType::Bump16));
    }

    #[test]
    fn test_first_match_wins() {
        // Both the displacement and displacement16 entries find a bounded
        // token here; the earlier table entry decides.
        assert_eq!(
            match_map_type("disp_displacement16"),
            Some(MapType::Displacement)
        );
    }

    #[test]
    fn test_find_resolution() {
        assert_eq!(find_resolution("wood_color_4k"), Some(Resolution::K4));
        assert_eq!(find_resolution("4k_wood_color"), Some(Resolution::K4));
        assert_eq!(find_resolution("wood_2k_color"), Some(Resolution::K2));
        assert_eq!(find_resolution("wood_8K_color"), Some(Resolution::K8));
        assert_eq!(find_resolution("wood_color"), None);
    }

    #[test]
    fn test_resolution_requires_boundaries() {
        // Trailing boundary required
        assert_eq!(find_resolution("wood_4ktile"), None);
        // Leading boundary required
        assert_eq!(find_resolution("wood14k"), None);
        // Unknown size class digits never match
        assert_eq!(find_resolution("wood_5k"), None);
        assert_eq!(find_resolution("wood_7k"), None);
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("Wood_Color_4K.jpg"), "wood_color_4k");
        assert_eq!(base_name("pack/maps/Wood_Color_4K.png"), "wood_color_4k");
        assert_eq!(base_name("no_extension"), "no_extension");
        assert_eq!(base_name(".hidden"), ".hidden");
    }
}
