use std::{any::type_name, fmt::Display, str::FromStr};

use roxmltree::Node;

use crate::{KeepDefault, Name, Problem, ProblemAt, ProblemsMut};

pub(crate) trait GetXmlAttribute {
    fn required_attribute(&self, attr: &str) -> Result<&str, ProblemAt>;

    fn parse_required_attribute<T: FromStr>(&self, attr: &str) -> Result<T, ProblemAt>
    where
        <T as FromStr>::Err: std::error::Error + Send + Sync + 'static;

    fn parse_attribute<T: FromStr>(&self, attr: &str) -> Option<Result<T, ProblemAt>>
    where
        <T as FromStr>::Err: std::error::Error + Send + Sync + 'static;

    fn parse_attribute_into<T: FromStr + Display>(
        &self,
        attr: &str,
        to: &mut T,
        problems: &mut impl ProblemsMut,
    ) where
        <T as FromStr>::Err: std::error::Error + Send + Sync + 'static;

    fn required_name(&self, problems: &mut impl ProblemsMut) -> Result<Name, ProblemAt>;

    fn optional_name(&self, attr: &str, problems: &mut impl ProblemsMut) -> Option<Name>;

    fn name(&self, node_index_in_xml_parent: usize, problems: &mut impl ProblemsMut) -> Name;
}

impl GetXmlAttribute for Node<'_, '_> {
    /// Returns value of an atrribute, or a problem if missing.
    fn required_attribute(&self, name: &str) -> Result<&str, ProblemAt> {
        self.attribute(name).ok_or_else(|| {
            Problem::XmlAttributeMissing {
                attr: name.to_owned(),
                tag: self.tag_name().name().to_owned(),
            }
            .at(self)
        })
    }

    /// Parse an XML attribute to the type `T`.
    ///
    /// If the attribute is missing or it can't be parsed to `T`, a problem is
    /// returned.
    fn parse_required_attribute<T: FromStr>(&self, attr: &str) -> Result<T, ProblemAt>
    where
        <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
    {
        let content = self.required_attribute(attr)?;
        parse_attribute_content(self, content, attr)
    }

    /// Parse an optional XML attribute to the type `T`. If it is missing,
    /// returns None.
    fn parse_attribute<T: FromStr>(&self, attr: &str) -> Option<Result<T, ProblemAt>>
    where
        <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
    {
        let content = self.attribute(attr)?;
        Some(parse_attribute_content(self, content, attr))
    }

    /// Overwrite `to` with an optional attribute. A missing attribute keeps
    /// `to` as is, an invalid one too but pushes a problem.
    fn parse_attribute_into<T: FromStr + Display>(
        &self,
        attr: &str,
        to: &mut T,
        problems: &mut impl ProblemsMut,
    ) where
        <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
    {
        if let Some(result) = self.parse_attribute(attr) {
            result.assign_or_keep(to, problems);
        }
    }

    /// Get the mandatory attribute "Name" of a channel or mode.
    ///
    /// Missing or blank names are a problem without fallback. Disallowed
    /// chars are replaced, pushing a problem.
    fn required_name(&self, problems: &mut impl ProblemsMut) -> Result<Name, ProblemAt> {
        let content = self.required_attribute("Name")?;
        if content.trim().is_empty() {
            Err(Problem::EmptyValue {
                field: "Name".into(),
                tag: self.tag_name().name().to_owned(),
            }
            .at(self))?
        }
        Ok(parse_name_or_fix(self, content, "Name", problems))
    }

    /// Get an attribute naming another entity. Missing and empty attributes
    /// both give None.
    fn optional_name(&self, attr: &str, problems: &mut impl ProblemsMut) -> Option<Name> {
        self.attribute(attr)
            .filter(|content| !content.is_empty())
            .map(|content| parse_name_or_fix(self, content, attr, problems))
    }

    /// Get attribute "Name".
    ///
    /// node_index_in_xml_parent is a 0-based index.
    ///
    /// If missing, provide a default and push a problem. If the Name is
    /// invalid, replace the disallowed chars and push a problem.
    fn name(&self, node_index_in_xml_parent: usize, problems: &mut impl ProblemsMut) -> Name {
        self.required_attribute("Name")
            .map(|name| parse_name_or_fix(self, name, "Name", problems))
            .unwrap_or_else(|p| {
                let default_name =
                    Name::valid_default(self.tag_name().name(), node_index_in_xml_parent);
                p.handled_by(format!("using default name '{default_name}'"), problems);
                default_name
            })
    }
}

pub(crate) fn parse_attribute_content<T: FromStr>(
    node: &Node,
    content: &str,
    attr: &str,
) -> Result<T, ProblemAt>
where
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    content.parse::<T>().map_err(|err| {
        Problem::InvalidAttribute {
            attr: attr.to_owned(),
            tag: node.tag_name().name().to_owned(),
            content: content.to_owned(),
            source: Box::new(err),
            expected_type: type_name::<T>().to_owned(),
        }
        .at(node)
    })
}

fn parse_name_or_fix(
    node: &Node,
    name: &str,
    attr: &str,
    problems: &mut impl ProblemsMut,
) -> Name {
    Name::try_from(name).unwrap_or_else(|e| {
        let fixed = e.fixed.clone();
        Problem::InvalidAttribute {
            attr: attr.into(),
            tag: node.tag_name().name().to_owned(),
            content: name.to_owned(),
            source: Box::new(e),
            expected_type: "Name".to_owned(),
        }
        .at(node)
        .handled_by("replacing invalid chars with '□'", problems);
        fixed
    })
}
