//! Dotted option flags.
//!
//! `--options.<path>=<value>` and `--templateOptions.<path>=<value>` address
//! arbitrary nested keys, which clap cannot declare up front. They are taken
//! out of the argument list before clap sees it. A flag without `=<value>`
//! means `true`.

use std::ffi::OsString;

const OPTIONS_PREFIX: &str = "--options.";
const TEMPLATE_OPTIONS_PREFIX: &str = "--templateOptions.";

/// Dotted flags in command-line order, values still raw.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct DottedArgs {
    pub(crate) options: Vec<(String, String)>,
    pub(crate) template_options: Vec<(String, String)>,
}

/// Separate dotted flags from the arguments clap should parse.
///
/// Everything after `--` is passed through untouched.
pub(crate) fn split_dotted<I>(args: I) -> (Vec<OsString>, DottedArgs)
where
    I: IntoIterator<Item = OsString>,
{
    let mut rest = Vec::new();
    let mut dotted = DottedArgs::default();
    let mut passthrough = false;

    for arg in args {
        if passthrough {
            rest.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            rest.push(arg);
            continue;
        }

        let Some(text) = arg.to_str() else {
            rest.push(arg);
            continue;
        };
        if let Some(spec) = text.strip_prefix(OPTIONS_PREFIX) {
            dotted.options.push(parse_pair(spec));
        } else if let Some(spec) = text.strip_prefix(TEMPLATE_OPTIONS_PREFIX) {
            dotted.template_options.push(parse_pair(spec));
        } else {
            rest.push(arg);
        }
    }

    (rest, dotted)
}

fn parse_pair(spec: &str) -> (String, String) {
    match spec.split_once('=') {
        Some((path, value)) => (path.to_owned(), value.to_owned()),
        None => (spec.to_owned(), "true".to_owned()),
    }
}
