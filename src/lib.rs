//! Convert gschem/gEDA schematics (`.sch`) and symbols (`.sym`) into flat
//! vector scenes.
//!
//! The pipeline runs in two passes:
//!
//! 1. [`resolve`] parses the input, attaches a symbol to every component
//!    instance (embedded `[ ]` body or library lookup, recursively) and
//!    finalizes the scene bounds.
//! 2. [`render::render`] walks the resolved tree, maps every primitive into
//!    output space, and classifies connection points.
//!
//! [`render::generate_svg`] serializes the resulting [`Scene`].

use pest_derive::Parser;

pub mod ast;
pub mod attrs;
pub mod config;
pub mod connectivity;
pub mod errors;
pub mod library;
pub mod log;
pub mod parse;
pub mod render;
pub mod resolve;
pub mod transform;
pub mod types;

pub use config::{Config, Palette};
pub use errors::{ConvertError, ParseError, ResolveError, SourceContext, SymbolNotFound};
pub use library::{DirectoryLibrary, MemoryLibrary, SymbolFile, SymbolLibrary};
pub use render::{Scene, generate_svg};
pub use resolve::{ResolvedSchematic, resolve};

#[derive(Parser)]
#[grammar = "schematic.pest"]
pub struct SchematicParser;

/// Resolve and lay out one schematic or symbol.
///
/// Structural problems anywhere in the input or in a referenced symbol abort
/// the conversion. Symbols that cannot be found end up in
/// [`Scene::diagnostics`] instead.
pub fn convert(ctx: &SourceContext, config: &Config, library: &dyn SymbolLibrary) -> Result<Scene, ConvertError> {
    let resolved = resolve(ctx, config, library)?;
    Ok(render::render(&resolved, config))
}

/// [`convert`] followed by SVG serialization
pub fn convert_to_svg(
    ctx: &SourceContext,
    config: &Config,
    library: &dyn SymbolLibrary,
) -> Result<String, ConvertError> {
    let scene = convert(ctx, config, library)?;
    Ok(generate_svg(&scene, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pest::Parser;

    #[test]
    fn header_rules() {
        for input in [
            "v 20130925 2",
            "L 0 0 100 100 3 0 0 0 -1 -1",
            "N 0 0 100 0 4",
            "U 0 0 100 0 10 0",
            "P 0 0 0 300 1 0 1",
            "B 0 0 100 100 3 0 0 0 -1 -1 0 -1 -1 -1 -1 -1",
            "V 0 0 100 3 0 0 0 -1 -1 0 -1 -1 -1 -1 -1",
            "A 0 0 100 0 90 3 0 0 0 -1 -1",
            "T 0 0 9 10 1 1 0 0 1",
            "H 3 10 0 0 -1 -1 0 -1 -1 -1 -1 -1 2",
            "C 100 100 1 0 0 resistor-1.sym",
            "G 0 0 10 10 0 0 0",
        ] {
            let result = SchematicParser::parse(Rule::header, input);
            assert!(result.is_ok(), "failed to parse {input:?}: {:?}", result.err());
        }
    }

    #[test]
    fn header_rules_reject_wrong_arity() {
        for input in ["N 0 0 100", "L 0 0 1 1 3", "C 0 0 1 0 0", "T 0 0 9 10 1 1 0 0"] {
            assert!(SchematicParser::parse(Rule::header, input).is_err(), "{input:?}");
        }
    }

    #[test]
    fn single_net_svg() {
        let svg = convert_to_svg(
            &SourceContext::new("net.sch", "N 0 0 100 0 4\n"),
            &Config::default(),
            &MemoryLibrary::new(),
        )
        .unwrap();
        insta::assert_snapshot!(svg, @r##"
        <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 2100 2000" width="2100" height="2000">
        <rect x="0" y="0" width="2100" height="2000" fill="#000000"/>
        <line x1="1000" y1="1000" x2="1100" y2="1000" stroke="#0000ff" stroke-width="3"/>
        <rect x="970" y="970" width="60" height="60" fill="#ff0000"/>
        <rect x="1070" y="970" width="60" height="60" fill="#ff0000"/>
        </svg>
        "##);
    }
}
