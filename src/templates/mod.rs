//! The fixed file set written into a new Python project.

use std::path::PathBuf;

use crate::config::Config;
use crate::request::{EnvTool, ScaffoldRequest};

pub const GITIGNORE: &str = r#".vscode
.venv
__pycache__
*.egg-info
dist
build
.pytest_cache
"#;

/// Values substituted into the templates.
#[derive(Debug, Clone)]
pub struct TemplateContext {
    pub project_name: String,
    pub package: String,
    pub version: String,
    pub description: String,
    pub license: String,
    pub authors: Vec<String>,
    pub env: EnvTool,
    pub tests: bool,
    pub windows: bool,
}

impl TemplateContext {
    pub fn new(request: &ScaffoldRequest, config: &Config) -> Self {
        Self {
            project_name: request.project_name.clone(),
            package: request.package_name(),
            version: config.version.clone(),
            description: config.description.clone(),
            license: config.license.clone(),
            authors: config.authors.clone(),
            env: request.env,
            tests: request.install_tests,
            windows: cfg!(windows),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// Relative to the project root.
    pub path: PathBuf,
    pub contents: String,
    pub executable: bool,
}

impl TemplateFile {
    fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self { path: path.into(), contents: contents.into(), executable: false }
    }

    fn script(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self { executable: true, ..Self::new(path, contents) }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    /// Created in order, relative to the project root.
    pub dirs: Vec<PathBuf>,
    pub files: Vec<TemplateFile>,
}

pub fn render(ctx: &TemplateContext) -> TemplateSet {
    let src = PathBuf::from("src").join(&ctx.package);
    let mut set = TemplateSet { dirs: vec![src.clone()], files: Vec::new() };

    set.files.push(TemplateFile::new("pyproject.toml", pyproject_toml(ctx)));
    set.files.push(TemplateFile::new(src.join("__init__.py"), init_py()));
    set.files.push(TemplateFile::new(src.join("__main__.py"), main_py(ctx)));

    if ctx.tests {
        set.dirs.push(PathBuf::from("tests"));
        set.files.push(TemplateFile::new(
            PathBuf::from("tests").join(format!("test_{}.py", ctx.package)),
            test_py(ctx),
        ));
    }

    let (build, install) = scripts(ctx);
    let ext = if ctx.windows { "bat" } else { "sh" };
    set.files.push(TemplateFile::script(format!("build.{ext}"), build));
    set.files.push(TemplateFile::script(format!("install.{ext}"), install));

    set.files.push(TemplateFile::new("README.md", readme_md(ctx)));
    set.files.push(TemplateFile::new(".gitignore", GITIGNORE));
    set
}

pub fn pyproject_toml(ctx: &TemplateContext) -> String {
    let pkg = &ctx.package;
    let mut out = String::new();
    match ctx.env {
        EnvTool::Pipenv => {
            out.push_str("[build-system]\n");
            out.push_str("requires = [\"setuptools\"]\n");
            out.push_str("build-backend = \"setuptools.build_meta\"\n\n");
            out.push_str("[project]\n");
            push_metadata(&mut out, ctx);
            let authors: Vec<String> = ctx.authors.iter().map(|a| pep621_author(a)).collect();
            out.push_str(&format!("authors = [{}]\n", authors.join(", ")));
            out.push_str("readme = \"README.md\"\n");
            out.push_str("dependencies = []\n\n");
            if ctx.tests {
                out.push_str("[project.optional-dependencies]\n");
                out.push_str("dev = [\"pytest\"]\n\n");
            }
            out.push_str("[project.scripts]\n");
        }
        EnvTool::Poetry => {
            out.push_str("[build-system]\n");
            out.push_str("requires = [\"poetry-core>=1.0.0\"]\n");
            out.push_str("build-backend = \"poetry.core.masonry.api\"\n\n");
            out.push_str("[tool.poetry]\n");
            push_metadata(&mut out, ctx);
            let authors: Vec<String> = ctx.authors.iter().map(|a| quote(a)).collect();
            out.push_str(&format!("authors = [{}]\n", authors.join(", ")));
            out.push_str("readme = \"README.md\"\n");
            let include = format!("{{ include = {}, from = \"src\" }}", quote(pkg));
            out.push_str(&format!("packages = [{include}]\n\n"));
            out.push_str("[tool.poetry.dependencies]\n");
            out.push_str("python = \"^3.8\"\n\n");
            out.push_str("[tool.poetry.scripts]\n");
        }
    }
    out.push_str(&format!("{pkg} = \"{pkg}.__main__:app\"\n"));
    out
}

fn push_metadata(out: &mut String, ctx: &TemplateContext) {
    out.push_str(&format!("name = {}\n", quote(&ctx.package)));
    out.push_str(&format!("version = {}\n", quote(&ctx.version)));
    out.push_str(&format!("description = {}\n", quote(&ctx.description)));
    out.push_str(&format!("license = {}\n", quote(&ctx.license)));
}

/// TOML basic string, escaped.
fn quote(s: &str) -> String {
    toml::Value::String(s.to_owned()).to_string()
}

/// `"Ada <ada@example.com>"` becomes `{ name = "Ada", email = "ada@example.com" }`.
fn pep621_author(author: &str) -> String {
    match author.split_once('<') {
        Some((name, rest)) if rest.ends_with('>') => {
            let email = rest.trim_end_matches('>').trim();
            let name = name.trim();
            if name.is_empty() {
                format!("{{ email = {} }}", quote(email))
            } else {
                format!("{{ name = {}, email = {} }}", quote(name), quote(email))
            }
        }
        _ => format!("{{ name = {} }}", quote(author.trim())),
    }
}

pub fn init_py() -> &'static str {
    r#"from importlib.metadata import version

__app_name__ = __name__
__version__ = version(__name__)
"#
}

pub fn main_py(ctx: &TemplateContext) -> String {
    format!(
        r#"from {pkg} import __app_name__, __version__


def app() -> None:
    print(f"{{__app_name__}} v{{__version__}}")


if __name__ == "__main__":
    app()
"#,
        pkg = ctx.package
    )
}

pub fn test_py(ctx: &TemplateContext) -> String {
    format!(
        r#"from {pkg} import __app_name__


def test_app_name():
    assert __app_name__ == "{pkg}"
"#,
        pkg = ctx.package
    )
}

/// Build and install scripts for the chosen environment tool.
pub fn scripts(ctx: &TemplateContext) -> (String, String) {
    let (build, install) = match ctx.env {
        EnvTool::Pipenv => ("pipenv run python -m build", "pipenv install --editable ."),
        EnvTool::Poetry => ("poetry build", "poetry install"),
    };
    if ctx.windows {
        (format!("@echo off\r\n{build}\r\n"), format!("@echo off\r\n{install}\r\n"))
    } else {
        (format!("#!/bin/sh\nset -e\n{build}\n"), format!("#!/bin/sh\nset -e\n{install}\n"))
    }
}

pub fn readme_md(ctx: &TemplateContext) -> String {
    let build = if ctx.windows { "build.bat" } else { "./build.sh" };
    let install = if ctx.windows { "install.bat" } else { "./install.sh" };
    let mut out = format!("# {}\n\n{}\n\n", ctx.project_name, ctx.description);
    out.push_str("## Installation\n\n");
    out.push_str(&format!(
        "Run `{install}` to install the project into its {} environment.\n\n",
        ctx.env
    ));
    out.push_str("## Building\n\n");
    out.push_str("1. Check the metadata in `pyproject.toml`.\n");
    out.push_str(&format!("2. Run `{build}` to build the project.\n\n"));
    if ctx.tests {
        out.push_str("## Testing\n\n");
        let runner = match ctx.env {
            EnvTool::Pipenv => "pipenv run pytest",
            EnvTool::Poetry => "poetry run pytest",
        };
        out.push_str(&format!("Run `{runner}`.\n\n"));
    }
    out.push_str("## Usage\n\n## Contributing\n\n## License\n\n");
    out.push_str(&format!("{}\n", ctx.license));
    out
}
