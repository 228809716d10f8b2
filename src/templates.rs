use minijinja::Environment;
use serde::Serialize;

pub const LOGIN: &str = "login.html";
pub const PAY: &str = "pay.html";
pub const RECEIPT: &str = "receipt.html";
pub const DOWNLOAD: &str = "download.html";

const SOURCES: &[(&str, &str)] = &[
    (LOGIN, include_str!("../templates/login.html")),
    (PAY, include_str!("../templates/pay.html")),
    (RECEIPT, include_str!("../templates/receipt.html")),
    (DOWNLOAD, include_str!("../templates/download.html")),
];

/// Compiled page templates. `.html` names get HTML auto-escaping.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in SOURCES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render<C: Serialize>(&self, name: &str, ctx: C) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }
}
