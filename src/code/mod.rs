//! @acp:module "Code Assembly"
//! @acp:summary "Value types that render new Go declarations as text"
//! @acp:domain codegen
//! @acp:layer model
//!
//! Callers build these values and hand them to the mutation API, which
//! renders them with `Display` and splices the text into the file. The same
//! `Parameter` type is shared with the extracted model.

mod import;
mod tags;

pub use import::{guess_package_name, Import};
pub use tags::Tags;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Type;

fn is_false(b: &bool) -> bool {
    !*b
}

/// @acp:summary "Function, method or function-type parameter"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: Type,
    /// `...T`, only valid on the last parameter
    #[serde(default, skip_serializing_if = "is_false")]
    pub variadic: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: Some(name.into()),
            ty,
            variadic: false,
        }
    }

    pub fn unnamed(ty: Type) -> Self {
        Self {
            name: None,
            ty,
            variadic: false,
        }
    }

    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{name} ")?;
        }
        if self.variadic {
            f.write_str("...")?;
        }
        write!(f, "{}", self.ty)
    }
}

/// `(a int, b string)`
pub(crate) fn write_params(f: &mut fmt::Formatter<'_>, params: &[Parameter]) -> fmt::Result {
    f.write_str("(")?;
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{param}")?;
    }
    f.write_str(")")
}

/// Nothing, ` T`, or ` (T, error)`.
pub(crate) fn write_results(f: &mut fmt::Formatter<'_>, results: &[Parameter]) -> fmt::Result {
    match results {
        [] => Ok(()),
        [single] if single.name.is_none() => write!(f, " {single}"),
        _ => {
            f.write_str(" ")?;
            write_params(f, results)
        }
    }
}

fn write_docs(f: &mut fmt::Formatter<'_>, docs: &[String]) -> fmt::Result {
    for line in docs {
        if line.is_empty() {
            writeln!(f, "//")?;
        } else {
            writeln!(f, "// {line}")?;
        }
    }
    Ok(())
}

/// Prefix every non-empty line of `text` with a tab.
pub(crate) fn indent(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for line in text.lines() {
        if !line.is_empty() {
            out.push('\t');
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// @acp:summary "Struct field to append or declare"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// `None` for an embedded field
    pub name: Option<String>,
    pub ty: Type,
    pub tags: Tags,
    pub docs: Vec<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: Some(name.into()),
            ty,
            tags: Tags::new(),
            docs: Vec::new(),
        }
    }

    pub fn embedded(ty: Type) -> Self {
        Self {
            name: None,
            ty,
            tags: Tags::new(),
            docs: Vec::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key, value);
        self
    }

    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_doc(mut self, line: impl Into<String>) -> Self {
        self.docs.push(line.into());
        self
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_docs(f, &self.docs)?;
        if let Some(name) = &self.name {
            write!(f, "{name} ")?;
        }
        write!(f, "{}", self.ty)?;
        if !self.tags.is_empty() {
            write!(f, " {}", self.tags.literal())?;
        }
        Ok(())
    }
}

/// @acp:summary "Interface method to append or declare"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub params: Vec<Parameter>,
    pub results: Vec<Parameter>,
    pub docs: Vec<String>,
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            results: Vec::new(),
            docs: Vec::new(),
        }
    }

    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_result(mut self, result: Parameter) -> Self {
        self.results.push(result);
        self
    }

    pub fn with_doc(mut self, line: impl Into<String>) -> Self {
        self.docs.push(line.into());
        self
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_docs(f, &self.docs)?;
        f.write_str(&self.name)?;
        write_params(f, &self.params)?;
        write_results(f, &self.results)
    }
}

/// @acp:summary "New top-level struct declaration"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Struct {
    pub name: String,
    pub fields: Vec<Field>,
    pub docs: Vec<String>,
}

impl Struct {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            docs: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_doc(mut self, line: impl Into<String>) -> Self {
        self.docs.push(line.into());
        self
    }
}

impl fmt::Display for Struct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_docs(f, &self.docs)?;
        if self.fields.is_empty() {
            return write!(f, "type {} struct{{}}", self.name);
        }
        writeln!(f, "type {} struct {{", self.name)?;
        for field in &self.fields {
            f.write_str(&indent(&field.to_string()))?;
        }
        f.write_str("}")
    }
}

/// @acp:summary "New top-level interface declaration"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    pub name: String,
    pub methods: Vec<Method>,
    pub docs: Vec<String>,
}

impl Interface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
            docs: Vec::new(),
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_doc(mut self, line: impl Into<String>) -> Self {
        self.docs.push(line.into());
        self
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_docs(f, &self.docs)?;
        if self.methods.is_empty() {
            return write!(f, "type {} interface{{}}", self.name);
        }
        writeln!(f, "type {} interface {{", self.name)?;
        for method in &self.methods {
            f.write_str(&indent(&method.to_string()))?;
        }
        f.write_str("}")
    }
}

/// @acp:summary "New top-level function or method declaration"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub receiver: Option<Parameter>,
    pub params: Vec<Parameter>,
    pub results: Vec<Parameter>,
    pub body: RawCode,
    pub docs: Vec<String>,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            receiver: None,
            params: Vec::new(),
            results: Vec::new(),
            body: RawCode::default(),
            docs: Vec::new(),
        }
    }

    pub fn with_receiver(mut self, receiver: Parameter) -> Self {
        self.receiver = Some(receiver);
        self
    }

    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_result(mut self, result: Parameter) -> Self {
        self.results.push(result);
        self
    }

    pub fn with_body(mut self, body: impl Into<RawCode>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_doc(mut self, line: impl Into<String>) -> Self {
        self.docs.push(line.into());
        self
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_docs(f, &self.docs)?;
        f.write_str("func ")?;
        if let Some(receiver) = &self.receiver {
            write!(f, "({receiver}) ")?;
        }
        f.write_str(&self.name)?;
        write_params(f, &self.params)?;
        write_results(f, &self.results)?;
        f.write_str(" {\n")?;
        f.write_str(&indent(&self.body.0))?;
        f.write_str("}")
    }
}

/// Verbatim statements, e.g. for a function body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCode(pub String);

impl From<&str> for RawCode {
    fn from(code: &str) -> Self {
        RawCode(code.to_string())
    }
}

impl From<String> for RawCode {
    fn from(code: String) -> Self {
        RawCode(code)
    }
}

impl fmt::Display for RawCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_rendering() {
        let field = Field::new("ID", Type::simple("int64")).with_tag("json", "id");
        assert_eq!(field.to_string(), "ID int64 `json:\"id\"`");

        let embedded = Field::embedded(Type::pointer(Type::simple("Base")));
        assert_eq!(embedded.to_string(), "*Base");
    }

    #[test]
    fn test_method_rendering() {
        let method = Method::new("Get")
            .with_param(Parameter::new("id", Type::simple("string")))
            .with_result(Parameter::unnamed(Type::pointer(Type::simple("User"))))
            .with_result(Parameter::unnamed(Type::simple("error")));
        assert_eq!(method.to_string(), "Get(id string) (*User, error)");
    }

    #[test]
    fn test_struct_rendering() {
        let st = Struct::new("User")
            .with_doc("User is a person.")
            .with_field(Field::new("Name", Type::simple("string")));
        assert_eq!(
            st.to_string(),
            "// User is a person.\ntype User struct {\n\tName string\n}"
        );
        assert_eq!(Struct::new("Empty").to_string(), "type Empty struct{}");
    }

    #[test]
    fn test_function_rendering() {
        let func = Function::new("Sum")
            .with_receiver(Parameter::new("c", Type::pointer(Type::simple("Calc"))))
            .with_param(Parameter::new("xs", Type::simple("int")).variadic())
            .with_result(Parameter::unnamed(Type::simple("int")))
            .with_body("total := 0\nreturn total");
        assert_eq!(
            func.to_string(),
            "func (c *Calc) Sum(xs ...int) int {\n\ttotal := 0\n\treturn total\n}"
        );
    }
}
