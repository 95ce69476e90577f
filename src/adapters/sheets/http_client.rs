use error_stack::ResultExt;
use google_sheets4::{hyper, hyper_rustls};

use crate::ports::load_error::LoadError;

pub type HttpsConnector = hyper_rustls::HttpsConnector<hyper::client::HttpConnector>;
pub type HttpClient = hyper::Client<HttpsConnector>;

/// HTTPS-only client trusting the platform's root certificates.
pub fn http_client() -> error_stack::Result<HttpClient, LoadError> {
    let connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()
        .change_context(LoadError::Connectivity)
        .attach_printable("could not load the native root certificates")?
        .https_only()
        .enable_http1()
        .build();

    Ok(hyper::Client::builder().build(connector))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_root_certificates_are_a_connectivity_error() {
        // Hosts without a certificate store fail here instead of panicking.
        if let Err(report) = http_client() {
            assert_eq!(report.current_context(), &LoadError::Connectivity);
        }
    }
}
