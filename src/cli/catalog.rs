//! An offline service catalog for the command line.
//!
//! The binary links no WSDL toolkit, so operations are named on the command
//! line and their samples are empty SOAP 1.1 envelopes.

use soapsender::{
    RemoteOperation, ServiceCatalog, ServiceDescription,
    service::{FetchError, GenerationError},
};

/// Serves a fixed list of operation names for any URL.
#[derive(Debug)]
pub struct ListedOperations {
    service_name: String,
    operations: Vec<String>,
}

impl ListedOperations {
    pub const fn new(service_name: String, operations: Vec<String>) -> Self {
        Self {
            service_name,
            operations,
        }
    }
}

impl ServiceCatalog for ListedOperations {
    fn fetch_operations(&self, url: &str) -> Result<ServiceDescription, FetchError> {
        tracing::debug!("Serving {} listed operations for {url}", self.operations.len());
        Ok(ServiceDescription {
            service_name: self.service_name.clone(),
            operations: self
                .operations
                .iter()
                .map(|name| Box::new(EnvelopeSkeleton::new(name.clone())) as Box<dyn RemoteOperation>)
                .collect(),
        })
    }
}

/// An operation whose sample is an envelope with one empty body element.
#[derive(Debug)]
pub struct EnvelopeSkeleton {
    name: String,
}

impl EnvelopeSkeleton {
    pub const fn new(name: String) -> Self {
        Self { name }
    }
}

impl RemoteOperation for EnvelopeSkeleton {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate_sample(&self) -> Result<String, GenerationError> {
        if !self
            .name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            return Err(GenerationError::new(format!(
                "'{}' is not a valid XML element name",
                self.name
            )));
        }

        Ok(format!(
            "<soapenv:Envelope xmlns:soapenv=\"http://schemas.xmlsoap.org/soap/envelope/\">\n   \
             <soapenv:Header/>\n   <soapenv:Body>\n      <{}/>\n   </soapenv:Body>\n\
             </soapenv:Envelope>\n",
            self.name
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skeleton_wraps_operation_in_body() {
        let sample = EnvelopeSkeleton::new("GetWeather".to_string())
            .generate_sample()
            .unwrap();

        assert!(sample.starts_with("<soapenv:Envelope"));
        assert!(sample.contains("<soapenv:Body>\n      <GetWeather/>\n   </soapenv:Body>"));
    }

    #[test]
    fn skeleton_rejects_non_element_names() {
        assert!(EnvelopeSkeleton::new("Get Weather".to_string())
            .generate_sample()
            .is_err());
    }

    #[test]
    fn catalog_serves_listed_operations_in_order() {
        let catalog = ListedOperations::new(
            "Weather".to_string(),
            vec!["b".to_string(), "a".to_string()],
        );

        let service = catalog.fetch_operations("http://x/ws").unwrap();

        let names: Vec<_> = service.operations.iter().map(|op| op.name()).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(service.service_name, "Weather");
    }
}
