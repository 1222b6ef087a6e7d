use crate::error::{MapError, Result};
use std::path::{Path, PathBuf};

const SEPARATORS: [char; 2] = ['/', '\\'];

/// Rebases `relative`, as written inside the document at `referencing`, onto
/// that document's directory.
///
/// Leading `../` segments walk up one directory each; leading `./` segments
/// are dropped. `referencing` must contain a directory separator. Walking up
/// stops at the root of an absolute base; past the top of a relative base the
/// remaining levels are kept as `../`.
pub fn resolve(relative: &str, referencing: &Path) -> Result<PathBuf> {
    let base = referencing.to_string_lossy();
    let Some(split) = base.rfind(SEPARATORS) else {
        return Err(MapError::PathResolution {
            relative: relative.to_owned(),
            base: base.into_owned(),
        });
    };

    let mut rest = relative;
    let mut levels = 0usize;
    loop {
        if let Some(stripped) = rest.strip_prefix("../").or_else(|| rest.strip_prefix("..\\")) {
            levels += 1;
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("./").or_else(|| rest.strip_prefix(".\\")) {
            rest = stripped;
        } else {
            break;
        }
    }

    // `None` once a relative base has been walked past its first component.
    let mut dir = Some(&base[..split]);
    let mut above = 0usize;
    for _ in 0..levels {
        match dir {
            Some(current) => match current.rfind(SEPARATORS) {
                Some(parent) => dir = Some(&current[..parent]),
                // An absolute base stops at the root.
                None if current.is_empty() => {}
                None => dir = None,
            },
            None => above += 1,
        }
    }

    let resolved = match dir {
        Some(dir) => format!("{dir}/{rest}"),
        None => format!("{}{rest}", "../".repeat(above)),
    };
    log::trace!("resolved {relative} against {base} -> {resolved}");
    Ok(PathBuf::from(resolved))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_up_parent_segments() {
        let resolved = resolve("../../tiles.tsx", Path::new("/a/b/c/map.tmx")).expect("resolve");
        assert_eq!(resolved, PathBuf::from("/a/tiles.tsx"));
    }

    #[test]
    fn sibling_reference_lands_next_to_the_map() {
        let resolved = resolve("tiles.tsx", Path::new("maps/level1.tmx")).expect("resolve");
        assert_eq!(resolved, PathBuf::from("maps/tiles.tsx"));

        let dotted = resolve("./sets/tiles.tsx", Path::new("maps/level1.tmx")).expect("resolve");
        assert_eq!(dotted, PathBuf::from("maps/sets/tiles.tsx"));
    }

    #[test]
    fn accepts_backslash_separators() {
        let resolved = resolve("..\\tiles.tsx", Path::new("C:\\game\\maps\\map.tmx")).expect("resolve");
        assert_eq!(resolved, PathBuf::from("C:\\game/tiles.tsx"));
    }

    #[test]
    fn stops_at_the_top_directory() {
        let resolved = resolve("../../../tiles.tsx", Path::new("/a/map.tmx")).expect("resolve");
        assert_eq!(resolved, PathBuf::from("/tiles.tsx"));
    }

    #[test]
    fn relative_base_can_be_walked_past() {
        let resolved = resolve("../tiles.tsx", Path::new("maps/level.tmx")).expect("resolve");
        assert_eq!(resolved, PathBuf::from("tiles.tsx"));

        let nested = resolve("../../tiles.tsx", Path::new("a/b/map.tmx")).expect("resolve");
        assert_eq!(nested, PathBuf::from("tiles.tsx"));

        let beyond = resolve("../../sets/tiles.tsx", Path::new("maps/level.tmx")).expect("resolve");
        assert_eq!(beyond, PathBuf::from("../sets/tiles.tsx"));
    }

    #[test]
    fn fails_without_a_directory() {
        let err = resolve("tiles.tsx", Path::new("map.tmx")).unwrap_err();
        assert!(matches!(err, MapError::PathResolution { .. }));
    }
}
