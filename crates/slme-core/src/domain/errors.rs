use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SlmeResult<T> = Result<T, SlmeError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlmeErrorCategory {
    Success,
    FormatError,
    UnsupportedUnitError,
    InputValidationError,
    ParseFailure,
    NumericalInstability,
    InternalError,
}

impl SlmeErrorCategory {
    pub const fn exit_placeholder(self) -> ExitPlaceholder {
        match self {
            Self::Success => ExitPlaceholder {
                exit_code: 0,
                rust_category: "Success",
                severity_class: "SUCCESS",
            },
            Self::FormatError => ExitPlaceholder {
                exit_code: 2,
                rust_category: "FormatError",
                severity_class: "INPUT_FATAL",
            },
            Self::UnsupportedUnitError => ExitPlaceholder {
                exit_code: 2,
                rust_category: "UnsupportedUnitError",
                severity_class: "INPUT_FATAL",
            },
            Self::InputValidationError => ExitPlaceholder {
                exit_code: 2,
                rust_category: "InputValidationError",
                severity_class: "INPUT_FATAL",
            },
            Self::ParseFailure => ExitPlaceholder {
                exit_code: 3,
                rust_category: "ParseFailure",
                severity_class: "IO_FATAL",
            },
            Self::NumericalInstability => ExitPlaceholder {
                exit_code: 4,
                rust_category: "NumericalInstability",
                severity_class: "RUN_FATAL",
            },
            Self::InternalError => ExitPlaceholder {
                exit_code: 5,
                rust_category: "InternalError",
                severity_class: "SYS_FATAL",
            },
        }
    }

    pub const fn exit_code(self) -> i32 {
        self.exit_placeholder().exit_code
    }

    pub const fn rust_category(self) -> &'static str {
        self.exit_placeholder().rust_category
    }

    pub const fn severity_class(self) -> &'static str {
        self.exit_placeholder().severity_class
    }

    pub const fn is_fatal(self) -> bool {
        !matches!(self, Self::Success)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitPlaceholder {
    pub exit_code: i32,
    pub rust_category: &'static str,
    pub severity_class: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlmeError {
    category: SlmeErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl SlmeError {
    pub fn new(
        category: SlmeErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn format(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(SlmeErrorCategory::FormatError, placeholder, message)
    }

    pub fn unsupported_unit(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(SlmeErrorCategory::UnsupportedUnitError, placeholder, message)
    }

    pub fn input_validation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(SlmeErrorCategory::InputValidationError, placeholder, message)
    }

    pub fn parse_failure(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(SlmeErrorCategory::ParseFailure, placeholder, message)
    }

    pub fn numerical(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(SlmeErrorCategory::NumericalInstability, placeholder, message)
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(SlmeErrorCategory::InternalError, placeholder, message)
    }

    pub const fn category(&self) -> SlmeErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        let severity = if self.category.is_fatal() {
            "ERROR"
        } else {
            "INFO"
        };
        format!("{}: [{}] {}", severity, self.placeholder, self.message)
    }

    pub fn fatal_exit_line(&self) -> Option<String> {
        self.category
            .is_fatal()
            .then(|| format!("FATAL EXIT CODE: {}", self.exit_code()))
    }
}

impl Display for SlmeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.rust_category(),
            self.placeholder,
            self.message
        )
    }
}

impl Error for SlmeError {}
