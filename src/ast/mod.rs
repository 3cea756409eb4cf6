//! The AST facade: a uniform, language-tagged surface over per-language
//! parse results.
//!
//! Scanners never touch a tree-sitter `Node` or a language-specific parse
//! tree directly — they only see [`Ast`], a tagged variant over [`AstBody`].
//! Every node inside an `AstBody` embeds a [`Locatable`] so findings can
//! always be traced back to `(file, line)`, and names are preserved
//! verbatim (no case folding) per the data model's AST facade invariants.

mod args;

pub use args::{extract_named_argument, extract_positional};

use crate::types::{LanguageTag, Locatable};
use serde::{Deserialize, Serialize};

/// A declared class/type: name, qualified name, superclass/base, and any
/// class-level decorators or annotations (`@RestController`,
/// `[ApiController]`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclaredType {
    pub loc: Locatable,
    pub name: String,
    pub qualified_name: String,
    pub superclass: Option<String>,
    pub annotations: Vec<Decorator>,
}

/// A method or function declaration, with ordered parameter names and any
/// decorators/annotations attached to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDecl {
    pub loc: Locatable,
    pub name: String,
    pub parameters: Vec<String>,
    pub is_async: bool,
    pub decorators: Vec<Decorator>,
    /// Name of the enclosing type, when the method is a member.
    pub owner: Option<String>,
}

/// An annotation/decorator/attribute: `@RestController`, `[Route("...")]`,
/// `@shared_task(queue='x')`. `arguments` is the raw, unparsed argument
/// text (e.g. `"/orders"` or `queue='x'`); use [`extract_named_argument`]
/// to pull a specific keyword argument out of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decorator {
    pub loc: Locatable,
    pub name: String,
    pub arguments: String,
}

/// A route declared directly (HTTP verb + path + handler reference), as
/// opposed to one inferred from an annotation on a method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDecl {
    pub loc: Locatable,
    pub verb: String,
    pub path: String,
    pub handler: Option<String>,
}

/// A framework directive that isn't a route or an annotation proper:
/// Rails `before_action`, a Ruby routes-DSL `namespace`/`resources` call,
/// a Python `@app.task` decorator read as a directive rather than a method
/// decorator, etc. `owner` is the enclosing class/module when known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Directive {
    pub loc: Locatable,
    pub name: String,
    pub arguments: String,
    pub owner: Option<String>,
}

/// A call-site expression: `send_email.delay(...)`, `app.get('/x', h)`,
/// `router.HandleFunc("/x", h)`. `receiver` is the object/identifier the
/// method is called on, when statically resolvable from the source text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSite {
    pub loc: Locatable,
    pub receiver: Option<String>,
    pub method: String,
    pub arguments: String,
    /// The function/method this call site appears inside of, when known.
    pub caller: Option<String>,
}

/// The minimum surface every language's AST exposes.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AstBody {
    pub types: Vec<DeclaredType>,
    pub methods: Vec<MethodDecl>,
    pub routes: Vec<RouteDecl>,
    pub directives: Vec<Directive>,
    pub call_sites: Vec<CallSite>,
}

/// A tagged variant keyed by language tag. Each language that has a
/// parser adapter produces one of these from [`crate::parsing::ParserAdapter::parse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Ast {
    Java(AstBody),
    Kotlin(AstBody),
    Python(AstBody),
    CSharp(AstBody),
    Go(AstBody),
    Ruby(AstBody),
    JavaScript(AstBody),
    TypeScript(AstBody),
}

impl Ast {
    pub fn language(&self) -> LanguageTag {
        match self {
            Ast::Java(_) => LanguageTag::Java,
            Ast::Kotlin(_) => LanguageTag::Kotlin,
            Ast::Python(_) => LanguageTag::Python,
            Ast::CSharp(_) => LanguageTag::CSharp,
            Ast::Go(_) => LanguageTag::Go,
            Ast::Ruby(_) => LanguageTag::Ruby,
            Ast::JavaScript(_) => LanguageTag::JavaScript,
            Ast::TypeScript(_) => LanguageTag::TypeScript,
        }
    }

    pub fn body(&self) -> &AstBody {
        match self {
            Ast::Java(b)
            | Ast::Kotlin(b)
            | Ast::Python(b)
            | Ast::CSharp(b)
            | Ast::Go(b)
            | Ast::Ruby(b)
            | Ast::JavaScript(b)
            | Ast::TypeScript(b) => b,
        }
    }

    pub fn new(language: LanguageTag, body: AstBody) -> Self {
        match language {
            LanguageTag::Java => Ast::Java(body),
            LanguageTag::Kotlin => Ast::Kotlin(body),
            LanguageTag::Python => Ast::Python(body),
            LanguageTag::CSharp => Ast::CSharp(body),
            LanguageTag::Go => Ast::Go(body),
            LanguageTag::Ruby => Ast::Ruby(body),
            LanguageTag::JavaScript => Ast::JavaScript(body),
            LanguageTag::TypeScript => Ast::TypeScript(body),
            LanguageTag::Other => Ast::JavaScript(body), // unreachable in practice; `other` never parses
        }
    }
}

impl DeclaredType {
    pub fn annotation(&self, name: &str) -> Option<&Decorator> {
        self.annotations.iter().find(|d| d.name == name)
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotation(name).is_some()
    }
}

impl MethodDecl {
    pub fn annotation(&self, name: &str) -> Option<&Decorator> {
        self.decorators.iter().find(|d| d.name == name)
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotation(name).is_some()
    }
}
