use askama::Template;

/// File types offered by the upload picker.
pub const C_UPLOAD_ACCEPT: &str = ".xlsx,.xlsm,.xls,.ods,application/vnd.openxmlformats-officedocument.spreadsheetml.sheet,application/vnd.ms-excel";

pub struct SpecOptionLink {
    pub href: &'static str,
    pub label: &'static str,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub title: &'static str,
    pub options: Vec<SpecOptionLink>,
}

impl Default for IndexTemplate {
    fn default() -> Self {
        Self {
            title: "Select Processing Option",
            options: vec![
                SpecOptionLink {
                    href: "/option1",
                    label: "Process Credit Card Numbers",
                },
                SpecOptionLink {
                    href: "/option2",
                    label: "Process Debit and Credit Data",
                },
            ],
        }
    }
}

#[derive(Template)]
#[template(path = "upload.html")]
pub struct UploadTemplate {
    pub title: String,
    pub action: &'static str,
    pub accept: &'static str,
}

impl UploadTemplate {
    /// Upload page of option `n_option` posting to `action`.
    pub fn for_option(n_option: u8, action: &'static str) -> Self {
        Self {
            title: format!("Upload a File for Option {n_option}"),
            action,
            accept: C_UPLOAD_ACCEPT,
        }
    }
}
