//! Symbol resolution and scene bounds.
//!
//! Turns the flat record list of the input file into a tree: every component
//! instance gets its symbol attached (parsed from the embedded `[ ]` body or
//! looked up in the [`SymbolLibrary`]), recursively. While descending, each
//! symbol's bounds are pushed through its instance placement and merged into
//! the parent's, so that by the time [`Resolver::resolve`] returns the scene
//! bounds are final.

use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::{Attribute, Component, Object, ObjectRecord};
use crate::config::Config;
use crate::errors::{ResolveError, SourceContext, SymbolNotFound};
use crate::library::SymbolLibrary;
use crate::parse::{ParsedFile, parse};
use crate::render::defaults::EXTENT_LIMIT;
use crate::transform::{Placement, SceneBounds};
use crate::types::BoundingBox;

/// Marker file-name prefix gschem writes for embedded symbols
const EMBEDDED_PREFIX: &str = "EMBEDDED";

/// A parsed symbol with its own instances resolved
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// Where the text came from (library path or `<embedded ...>`)
    pub origin: String,
    pub objects: Vec<ResolvedObject>,
    /// Bounds in the symbol's own coordinates, nested instances included
    pub bounds: BoundingBox,
    /// Number of symbol levels below this one
    height: usize,
}

impl Symbol {
    pub fn height(&self) -> usize {
        self.height
    }
}

/// How an instance's symbol was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolSource {
    /// Parsed from the instance's own `[ ]` body
    Embedded,
    /// Found in the library at this origin
    Library(String),
    /// Not found; the instance draws nothing
    Missing,
}

/// A component record with its symbol attached
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub component: Component,
    /// Instance-level attributes, which take precedence over symbol text
    pub attributes: Vec<Attribute>,
    /// Symbol-local to parent-local mapping
    pub placement: Placement,
    pub source: SymbolSource,
    pub symbol: Option<Rc<Symbol>>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedObject {
    Primitive(ObjectRecord),
    Instance(Instance),
}

/// The whole input with every reachable symbol attached
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSchematic {
    pub objects: Vec<ResolvedObject>,
    pub bounds: SceneBounds,
    /// One entry per instance whose symbol could not be located
    pub diagnostics: Vec<SymbolNotFound>,
}

/// Placement policy for one instance.
///
/// Embedded bodies are already written in the coordinates they are drawn
/// at, so they are placed with the identity whatever the record declares.
pub fn instance_placement(component: &Component) -> Placement {
    if component.is_embedded() {
        Placement::IDENTITY
    } else {
        Placement::new(component.origin, component.rotation, component.mirrored)
    }
}

pub struct Resolver<'a> {
    config: &'a Config,
    library: &'a dyn SymbolLibrary,
    /// Library symbols by file name; `None` remembers a failed lookup
    cache: HashMap<String, Option<Rc<Symbol>>>,
    diagnostics: Vec<SymbolNotFound>,
}

impl<'a> Resolver<'a> {
    pub fn new(config: &'a Config, library: &'a dyn SymbolLibrary) -> Self {
        Resolver {
            config,
            library,
            cache: HashMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Parse `ctx` and resolve every instance it contains
    pub fn resolve(mut self, ctx: &SourceContext) -> Result<ResolvedSchematic, ResolveError> {
        let parsed = parse(ctx)?;
        let mut chain = vec![ctx.name.clone()];
        let (objects, bbox, _) = self.resolve_file(parsed, &mut chain)?;

        let bounds = SceneBounds::finalize(bbox);
        crate::log::info!(
            source = %ctx.name,
            symbols = self.cache.len(),
            missing = self.diagnostics.len(),
            "resolved schematic"
        );
        Ok(ResolvedSchematic {
            objects,
            bounds,
            diagnostics: self.diagnostics,
        })
    }

    /// Resolve the instances of one parsed file.
    ///
    /// `chain` holds the names from the input file down to the file being
    /// resolved. Returns the resolved objects, their bounds, and how many
    /// symbol levels sit below this file.
    fn resolve_file(
        &mut self,
        parsed: ParsedFile,
        chain: &mut Vec<String>,
    ) -> Result<(Vec<ResolvedObject>, BoundingBox, usize), ResolveError> {
        let ParsedFile { records, mut bounds } = parsed;
        let mut objects = Vec::with_capacity(records.len());
        let mut height = 0;

        for record in records {
            let ObjectRecord {
                object,
                attributes,
                line,
            } = record;
            let component = match object {
                Object::Component(component) => component,
                object => {
                    objects.push(ResolvedObject::Primitive(ObjectRecord {
                        object,
                        attributes,
                        line,
                    }));
                    continue;
                }
            };

            let placement = instance_placement(&component);
            let (source, symbol) = self.resolve_instance(&component, chain)?;
            if let Some(symbol) = &symbol {
                bounds.expand_box(&symbol.bounds.transformed(&placement));
                height = height.max(symbol.height + 1);
                check_extent(&bounds, chain)?;
            }
            objects.push(ResolvedObject::Instance(Instance {
                component,
                attributes,
                placement,
                source,
                symbol,
                line,
            }));
        }
        Ok((objects, bounds, height))
    }

    fn resolve_instance(
        &mut self,
        component: &Component,
        chain: &mut Vec<String>,
    ) -> Result<(SymbolSource, Option<Rc<Symbol>>), ResolveError> {
        let name = &component.basename;
        if component.is_embedded() != name.starts_with(EMBEDDED_PREFIX) {
            crate::log::warn!(
                symbol = %name,
                has_body = component.is_embedded(),
                "embedded marker and `[ ]` body disagree; going by the body"
            );
        }

        if let Some(body) = &component.embedded {
            let ctx = SourceContext::new(format!("<embedded {name}>"), body.as_str());
            let symbol = self.load(&ctx, name, chain)?;
            return Ok((SymbolSource::Embedded, Some(Rc::new(symbol))));
        }

        if let Some(cached) = self.cache.get(name) {
            crate::log::debug!(symbol = %name, "symbol cache hit");
            return match cached.clone() {
                Some(symbol) => {
                    self.check_depth(chain, name, symbol.height)?;
                    Ok((SymbolSource::Library(symbol.origin.clone()), Some(symbol)))
                }
                None => {
                    self.report_missing(name, chain);
                    Ok((SymbolSource::Missing, None))
                }
            };
        }

        let Some(file) = self.library.find(name)? else {
            self.cache.insert(name.clone(), None);
            self.report_missing(name, chain);
            return Ok((SymbolSource::Missing, None));
        };
        let ctx = SourceContext::new(file.origin.clone(), file.text);
        let symbol = Rc::new(self.load(&ctx, name, chain)?);
        self.cache.insert(name.clone(), Some(Rc::clone(&symbol)));
        Ok((SymbolSource::Library(file.origin), Some(symbol)))
    }

    /// Parse and resolve one symbol one level below `chain`
    fn load(&mut self, ctx: &SourceContext, name: &str, chain: &mut Vec<String>) -> Result<Symbol, ResolveError> {
        self.check_depth(chain, name, 0)?;
        let parsed = parse(ctx)?;

        chain.push(name.to_string());
        let resolved = self.resolve_file(parsed, chain);
        chain.pop();

        let (objects, bounds, height) = resolved?;
        crate::log::debug!(symbol = %name, origin = %ctx.name, height, "resolved symbol");
        Ok(Symbol {
            origin: ctx.name.clone(),
            objects,
            bounds,
            height,
        })
    }

    /// Fail if placing `name` (with `height` levels of its own below it)
    /// under `chain` would nest deeper than allowed
    fn check_depth(&self, chain: &[String], name: &str, height: usize) -> Result<(), ResolveError> {
        // chain[0] is the input file, which is not a symbol level
        let level = chain.len() + height;
        if level > self.config.max_depth {
            let mut names: Vec<&str> = chain.iter().map(String::as_str).collect();
            names.push(name);
            return Err(ResolveError::RecursionDepthExceeded {
                limit: self.config.max_depth,
                chain: names.join(" -> "),
            });
        }
        Ok(())
    }

    fn report_missing(&mut self, name: &str, chain: &[String]) {
        let referenced_from = chain.last().cloned().unwrap_or_default();
        crate::log::warn!(symbol = %name, from = %referenced_from, "component not found");
        self.diagnostics.push(SymbolNotFound {
            name: name.to_string(),
            referenced_from,
        });
    }
}

/// Nested placements add up; stop before coordinates leave the drawable range
fn check_extent(bounds: &BoundingBox, chain: &[String]) -> Result<(), ResolveError> {
    if bounds.is_empty() {
        return Ok(());
    }
    let limit = EXTENT_LIMIT.unsigned_abs();
    let inside = [bounds.min, bounds.max]
        .iter()
        .all(|p| p.x.unsigned_abs() <= limit && p.y.unsigned_abs() <= limit);
    if inside {
        Ok(())
    } else {
        Err(ResolveError::ExtentExceeded {
            limit: EXTENT_LIMIT,
            chain: chain.join(" -> "),
        })
    }
}

/// Resolve `ctx` against `library` with the settings in `config`
pub fn resolve(
    ctx: &SourceContext,
    config: &Config,
    library: &dyn SymbolLibrary,
) -> Result<ResolvedSchematic, ResolveError> {
    Resolver::new(config, library).resolve(ctx)
}
