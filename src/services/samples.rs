// src/services/samples.rs
//! Built-in sample inputs for `--example`.

use crate::api::upload::Document;

/// Sample e-Archive notification used by `sign cades --example`.
pub const EXAMPLE_CADES_CONTENT: &str = r#"{"id":"EAA2025000000014","cid":"23a1636a-9ae0-4c30-b3f7-2b9dd622af75","type":"EArchiveSent","account":5278,"timestamp":"2025-12-18T15:05:26.266Z"}"#;

const EXAMPLE_INVOICE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Invoice xmlns="urn:oasis:names:specification:ubl:schema:xsd:Invoice-2"
         xmlns:cac="urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2"
         xmlns:cbc="urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2">
    <cbc:UBLVersionID>2.1</cbc:UBLVersionID>
    <cbc:CustomizationID>TR1.2</cbc:CustomizationID>
    <cbc:ProfileID>TICARIFATURA</cbc:ProfileID>
    <cbc:ID>TST2024000000001</cbc:ID>
    <cbc:IssueDate>2024-01-15</cbc:IssueDate>
    <cbc:IssueTime>10:30:00</cbc:IssueTime>
    <cbc:InvoiceTypeCode>SATIS</cbc:InvoiceTypeCode>
</Invoice>
"#;

const EXAMPLE_SOAP_11: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
    <soap:Body>
        <ns:TestRequest xmlns:ns="http://example.com/test">
            <ns:message>Test SOAP 1.1 Message</ns:message>
        </ns:TestRequest>
    </soap:Body>
</soap:Envelope>
"#;

const EXAMPLE_SOAP_12: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<env:Envelope xmlns:env="http://www.w3.org/2003/05/soap-envelope">
    <env:Body>
        <ns:TestRequest xmlns:ns="http://example.com/test">
            <ns:message>Test SOAP 1.2 Message</ns:message>
        </ns:TestRequest>
    </env:Body>
</env:Envelope>
"#;

/// Minimal UBL-TR invoice, uploaded as `example-invoice.xml`.
pub fn example_invoice() -> Document {
    Document::new("example-invoice.xml", EXAMPLE_INVOICE)
}

/// SOAP envelope in the requested version, uploaded as
/// `example-soap11.xml` or `example-soap12.xml`.
pub fn example_soap(soap12: bool) -> Document {
    if soap12 {
        Document::new("example-soap12.xml", EXAMPLE_SOAP_12)
    } else {
        Document::new("example-soap11.xml", EXAMPLE_SOAP_11)
    }
}
