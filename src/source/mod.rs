//! @acp:module "Source"
//! @acp:summary "Caller-facing handle: queries plus the splice-and-reparse mutation API"
//! @acp:domain codegen
//! @acp:layer api
//!
//! Every mutation locates its target in the current [`File`], computes one
//! splice, parses the spliced text from scratch, and only then swaps the
//! snapshot. A failed parse leaves the previous snapshot in place.
//!
//! ```rust,no_run
//! use gosource::{Field, Source, Type};
//!
//! let mut source = Source::new("package p\n\ntype T struct {\n\tX int\n}\n")?;
//! source.append_field("T", &Field::new("Y", Type::simple("string")))?;
//! println!("{}", source.render()?);
//! # Ok::<(), gosource::SourceError>(())
//! ```

mod splice;

use std::path::Path;
use std::sync::Arc;

use crate::annotation::{Annotation, AnnotationParser};
use crate::build::{BuildContext, Cached, GoBuildContext};
use crate::code::{self, Field, Import, Method, Parameter, Struct};
use crate::config::Config;
use crate::error::{Result, SourceError};
use crate::file::{File, Function, Interface, Span, Structure};
use crate::format::Formatter;
use crate::parse::Parser;

use splice::Splice;

/// @acp:summary "Long-lived handle over the current File snapshot"
pub struct Source {
    parser: Parser,
    formatter: Box<dyn Formatter>,
    indent: String,
    file: File,
}

impl Source {
    /// Parse `text` with default settings.
    pub fn new(text: impl Into<String>) -> Result<Self> {
        Self::builder().parse(text)
    }

    pub fn with_config(text: impl Into<String>, config: &Config) -> Result<Self> {
        Self::builder().config(config).parse(text)
    }

    /// Read and parse a file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().open(path)
    }

    pub fn builder() -> SourceBuilder {
        SourceBuilder::default()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn file(&self) -> &File {
        &self.file
    }

    /// Current unformatted text.
    pub fn text(&self) -> &str {
        &self.file.source
    }

    pub fn package(&self) -> &str {
        &self.file.package
    }

    pub fn imports(&self) -> &[Import] {
        &self.file.imports
    }

    pub fn structures(&self) -> impl Iterator<Item = &Structure> {
        self.file.structures.values()
    }

    pub fn structure(&self, name: &str) -> Option<&Structure> {
        self.file.structure(name)
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &Interface> {
        self.file.interfaces.values()
    }

    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.file.interface(name)
    }

    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.file.functions.values()
    }

    /// Look a function up by name, or a method by `Recv.Name`.
    pub fn function(&self, key: &str) -> Option<&Function> {
        self.file.function(key)
    }

    /// Formatted text of the current snapshot.
    pub fn render(&self) -> Result<String> {
        self.formatter.format(self.text())
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// @acp:summary "Append a field before the closing brace of a struct"
    pub fn append_field(&mut self, structure: &str, field: &Field) -> Result<()> {
        let inner = self.structure_inner(structure)?;
        let splice = splice::append_to_inner(self.text(), inner, &field.to_string(), &self.indent);
        self.commit(splice)
    }

    /// @acp:summary "Append a method before the closing brace of an interface"
    pub fn append_method(&mut self, interface: &str, method: &Method) -> Result<()> {
        let inner = self
            .interface(interface)
            .ok_or_else(|| SourceError::not_found("interface", interface))?
            .inner
            .ok_or_else(|| SourceError::not_found("interface body", interface))?;
        let splice =
            splice::append_to_inner(self.text(), inner, &method.to_string(), &self.indent);
        self.commit(splice)
    }

    /// @acp:summary "Append statements at the end of a function body"
    pub fn append_code(&mut self, function: &str, code: &str) -> Result<()> {
        let func = self
            .function(function)
            .ok_or_else(|| SourceError::not_found("function", function))?;
        let inner = func.inner.ok_or_else(|| SourceError::NoBody {
            name: function.to_string(),
        })?;
        let splice = splice::append_to_inner(self.text(), inner, code, &self.indent);
        self.commit(splice)
    }

    /// @acp:summary "Append a parameter after the existing ones"
    pub fn append_parameter(&mut self, function: &str, param: &Parameter) -> Result<()> {
        let func = self
            .function(function)
            .ok_or_else(|| SourceError::not_found("function", function))?;
        let splice = splice::append_parameter(
            self.text(),
            func.params_span,
            func.last_param_end,
            &param.to_string(),
            &self.indent,
        );
        self.commit(splice)
    }

    /// @acp:summary "Add an import unless the same spec already exists"
    pub fn append_import(&mut self, import: &Import) -> Result<()> {
        if self.file.has_import(import) {
            tracing::debug!(path = %import.path, "import already present");
            return Ok(());
        }
        let splice = splice::append_import(&self.file, import, &self.indent);
        self.commit(splice)
    }

    pub fn append_structure(&mut self, structure: &Struct) -> Result<()> {
        self.append_declaration(&structure.to_string())
    }

    pub fn append_interface(&mut self, interface: &code::Interface) -> Result<()> {
        self.append_declaration(&interface.to_string())
    }

    pub fn append_function(&mut self, function: &code::Function) -> Result<()> {
        self.append_declaration(&function.to_string())
    }

    fn append_declaration(&mut self, code: &str) -> Result<()> {
        let splice = splice::append_declaration(self.text(), code);
        self.commit(splice)
    }

    /// @acp:summary "Attach an annotation line to a struct's doc comment"
    pub fn annotate_structure(&mut self, name: &str, annotation: &Annotation) -> Result<()> {
        let span = self
            .structure(name)
            .ok_or_else(|| SourceError::not_found("structure", name))?
            .span;
        self.annotate_at(span, annotation)
    }

    pub fn annotate_interface(&mut self, name: &str, annotation: &Annotation) -> Result<()> {
        let span = self
            .interface(name)
            .ok_or_else(|| SourceError::not_found("interface", name))?
            .span;
        self.annotate_at(span, annotation)
    }

    pub fn annotate_function(&mut self, key: &str, annotation: &Annotation) -> Result<()> {
        let span = self
            .function(key)
            .ok_or_else(|| SourceError::not_found("function", key))?
            .span;
        self.annotate_at(span, annotation)
    }

    /// Attach `annotation` above the declaration holding `field`.
    ///
    /// Names declared together (`a, b int`) share one doc comment, so every
    /// name of that declaration carries the new annotation.
    pub fn annotate_field(
        &mut self,
        structure: &str,
        field: &str,
        annotation: &Annotation,
    ) -> Result<()> {
        let span = self
            .structure(structure)
            .ok_or_else(|| SourceError::not_found("structure", structure))?
            .field(field)
            .ok_or_else(|| SourceError::member_not_found("field", field, "structure", structure))?
            .span;
        self.annotate_at(span, annotation)
    }

    pub fn annotate_method(
        &mut self,
        interface: &str,
        method: &str,
        annotation: &Annotation,
    ) -> Result<()> {
        let span = self
            .interface(interface)
            .ok_or_else(|| SourceError::not_found("interface", interface))?
            .method(method)
            .ok_or_else(|| {
                SourceError::member_not_found("method", method, "interface", interface)
            })?
            .span;
        self.annotate_at(span, annotation)
    }

    fn annotate_at(&mut self, span: Span, annotation: &Annotation) -> Result<()> {
        let line = annotation.render(self.parser.annotations().marker());
        let splice = splice::comment_above(self.text(), span.begin, &line);
        self.commit(splice)
    }

    fn structure_inner(&self, name: &str) -> Result<Span> {
        self.structure(name)
            .ok_or_else(|| SourceError::not_found("structure", name))?
            .inner
            .ok_or_else(|| SourceError::not_found("structure body", name))
    }

    /// Apply `splice`, re-parse, and replace the snapshot on success only.
    fn commit(&mut self, splice: Splice) -> Result<()> {
        let text = splice.apply(self.text());
        tracing::debug!(
            begin = splice.range.start,
            end = splice.range.end,
            inserted = splice.text.len(),
            "applying splice"
        );
        self.file = self.parser.parse(&text)?;
        Ok(())
    }
}

/// @acp:summary "Configures collaborators before the first parse"
pub struct SourceBuilder {
    marker: String,
    strict: bool,
    indent: String,
    formatter: Box<dyn Formatter>,
    context: Option<Arc<dyn BuildContext>>,
    config: Config,
}

impl Default for SourceBuilder {
    fn default() -> Self {
        let config = Config::default();
        Self {
            marker: config.marker.clone(),
            strict: config.strict_annotations,
            indent: config.indent.clone(),
            formatter: config.formatter.formatter(),
            context: None,
            config,
        }
    }
}

impl SourceBuilder {
    /// Take every setting from `config`.
    pub fn config(mut self, config: &Config) -> Self {
        self.marker = config.marker.clone();
        self.strict = config.strict_annotations;
        self.indent = config.indent.clone();
        self.formatter = config.formatter.formatter();
        self.config = config.clone();
        self
    }

    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn strict_annotations(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Replace filesystem import resolution. The context is memoised.
    pub fn build_context(mut self, context: impl BuildContext + 'static) -> Self {
        self.context = Some(Arc::new(Cached::new(context)));
        self
    }

    pub fn parse(self, text: impl Into<String>) -> Result<Source> {
        let context: Arc<dyn BuildContext> = match self.context {
            Some(context) => context,
            None => Arc::new(Cached::new(GoBuildContext::with_config(&self.config.build))),
        };
        let annotations = AnnotationParser::new(self.marker).strict(self.strict);
        let parser = Parser::new(annotations, context);
        let file = parser.parse(&text.into())?;
        Ok(Source {
            parser,
            formatter: self.formatter,
            indent: self.indent,
            file,
        })
    }

    pub fn open<P: AsRef<Path>>(self, path: P) -> Result<Source> {
        let text = std::fs::read_to_string(path)?;
        self.parse(text)
    }
}
