use serde::Serialize;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait TemplateService: Send + Sync + 'static {
    /// Render the given template.
    fn render<T: Template + 'static>(&self, template: &T) -> anyhow::Result<String>;
}

#[cfg(feature = "mock")]
impl MockTemplateService {
    pub fn with_render<T: Template + Send + PartialEq + std::fmt::Debug + 'static>(
        mut self,
        template: T,
        result: String,
    ) -> Self {
        self.expect_render()
            .once()
            .with(mockall::predicate::eq(template))
            .return_once(|_| Ok(result));
        self
    }
}

/// A template is rendered verbatim: values are not escaped by the renderer,
/// so callers must pass html-safe values into html templates.
pub trait Template: Serialize {
    const NAME: &'static str;
    const TEMPLATE: &'static str;
}

macro_rules! templates {
    ($( $ident:ident ( $path:literal ), )* ) => {
        $(
            impl Template for $ident {
                const NAME: &'static str = stringify!($ident);
                const TEMPLATE: &'static str = include_str!(concat!("../templates/", $path));
            }
        )*

        pub const TEMPLATES: &[(&str, &str)] = &[
            $( ($ident::NAME, $ident::TEMPLATE) ),*
        ];
    };
}

templates! {
    ContactHtmlTemplate("contact.html"),
    ContactTextTemplate("contact.txt"),
}

/// Html body of a relayed contact message. All fields must already be html
/// escaped, newlines in `message` replaced by `<br>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactHtmlTemplate {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Plain text body of a relayed contact message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactTextTemplate {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}
