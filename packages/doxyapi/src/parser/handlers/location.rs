// Location
//
// `<location>` elements carry a declaration site (`file`/`line`) and an
// optional body site (`bodyfile`/`bodystart`/`bodyend`). Line numbers are
// reported as Doxygen writes them, even where it is known to be off by one.

use crate::api::{BodyLocation, Location};
use crate::error::{ApiError, Result};
use crate::location_mapper::PathMapper;
use crate::xml::XmlElement;

/// Which site becomes the reported `path`/`line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationPreference {
    Declaration,
    /// Used for macros, whose declaration site is the header guard use site.
    Body,
}

pub fn parse_location(
    element: &XmlElement,
    path_mapper: &dyn PathMapper,
    preference: LocationPreference,
) -> Result<Location> {
    let location = element.require_child("location")?;

    let file = location.require_attribute("file")?;
    let line = parse_line(location, "line", location.require_attribute("line")?)?;
    let body = parse_body(location, path_mapper)?;

    let (reported_file, reported_line) = match (&body, preference) {
        (Some((body_file, body)), LocationPreference::Body) => (*body_file, body.line_start),
        _ => (file, line),
    };

    let path = path_mapper.to_project_relative_path(reported_file)?;
    let body = body
        .map(|(_, body)| body)
        .filter(|body| body.path != path || body.line_start != reported_line);

    Ok(Location {
        include: path_mapper.to_include_directive(reported_file),
        path,
        line: reported_line,
        body,
    })
}

fn parse_body<'a>(
    location: &'a XmlElement,
    path_mapper: &dyn PathMapper,
) -> Result<Option<(&'a str, BodyLocation)>> {
    let (Some(file), Some(start)) = (location.attribute("bodyfile"), location.attribute("bodystart"))
    else {
        return Ok(None);
    };

    // Doxygen writes bodyend="-1" when the end is unknown.
    let line_end = match location.attribute("bodyend") {
        Some(end) if !end.starts_with('-') => Some(parse_line(location, "bodyend", end)?),
        _ => None,
    };

    Ok(Some((
        file,
        BodyLocation {
            path: path_mapper.to_project_relative_path(file)?,
            line_start: parse_line(location, "bodystart", start)?,
            line_end,
        },
    )))
}

fn parse_line(location: &XmlElement, field: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| ApiError::invalid_value(&location.tag, field, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location_mapper::LocationMapper;
    use std::path::PathBuf;

    fn mapper() -> LocationMapper {
        LocationMapper::new("/project", vec![PathBuf::from("/project/src")]).unwrap()
    }

    fn memberdef(location: XmlElement) -> XmlElement {
        XmlElement::new("memberdef").with_child(location)
    }

    #[test]
    fn body_is_reported_when_it_differs() {
        let element = memberdef(
            XmlElement::new("location")
                .with_attribute("file", "/project/src/coffee/coffee.h")
                .with_attribute("line", "12")
                .with_attribute("bodyfile", "/project/src/coffee/coffee.cpp")
                .with_attribute("bodystart", "40")
                .with_attribute("bodyend", "-1"),
        );

        let location =
            parse_location(&element, &mapper(), LocationPreference::Declaration).unwrap();

        assert_eq!(location.path, "src/coffee/coffee.h");
        assert_eq!(location.line, 12);
        assert_eq!(location.include.as_deref(), Some("coffee/coffee.h"));
        assert_eq!(
            location.body,
            Some(BodyLocation {
                path: "src/coffee/coffee.cpp".to_string(),
                line_start: 40,
                line_end: None,
            })
        );
    }

    #[test]
    fn body_preference_wins_over_declaration() {
        let element = memberdef(
            XmlElement::new("location")
                .with_attribute("file", "/project/src/version.h")
                .with_attribute("line", "1")
                .with_attribute("bodyfile", "/project/src/version.h")
                .with_attribute("bodystart", "5")
                .with_attribute("bodyend", "-1"),
        );

        let location = parse_location(&element, &mapper(), LocationPreference::Body).unwrap();

        assert_eq!(location.line, 5);
        assert_eq!(location.body, None);
    }

    #[test]
    fn body_preference_falls_back_to_declaration() {
        let element = memberdef(
            XmlElement::new("location")
                .with_attribute("file", "/project/src/version.h")
                .with_attribute("line", "3"),
        );

        let location = parse_location(&element, &mapper(), LocationPreference::Body).unwrap();
        assert_eq!(location.line, 3);
    }

    #[test]
    fn missing_location_names_the_tag() {
        let err = parse_location(
            &XmlElement::new("memberdef"),
            &mapper(),
            LocationPreference::Declaration,
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::MissingChild { parent, child }
            if parent == "memberdef" && child == "location"));
    }
}
