pub(crate) mod get_xml_attribute;
pub(crate) mod get_xml_node;

pub(crate) use get_xml_attribute::GetXmlAttribute;
pub(crate) use get_xml_node::GetXmlNode;
