//! Parser for catalog data files.
//!
//! Handles the three `::`-separated exports of the platform database:
//! - courses.dat: id::title::description::instructor_id::department_id::thumbnail_url
//! - instructors.dat: id::first_name::last_name
//! - departments.dat: id::name
//!
//! Optional fields may be left empty (`3::Rust 101::::7::::`).

use crate::error::{CatalogError, Result};
use crate::types::*;
use std::fs;
use std::path::Path;

/// Read a catalog file into lines, mapping a missing file to `FileNotFound`
fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CatalogError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => CatalogError::IoError(e),
    })?;

    Ok(content.lines().map(|s| s.to_string()).collect())
}

/// Iterate over the non-blank lines of a file together with 1-based line numbers
fn data_lines(lines: &[String]) -> impl Iterator<Item = (usize, &str)> {
    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

/// Take the next `::` field or report which one is missing
fn next_field<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
    file: &str,
    line: usize,
    name: &str,
) -> Result<&'a str> {
    parts.next().ok_or_else(|| CatalogError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Missing {}", name),
    })
}

/// Parse a required, strictly positive id
fn parse_id(value: &str, file: &str, line: usize, name: &str) -> Result<u32> {
    let id: u32 = value.parse().map_err(|e| CatalogError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Invalid {}: {}", name, e),
    })?;
    if id == 0 {
        return Err(CatalogError::InvalidValue {
            field: name.to_string(),
            value: value.to_string(),
        });
    }
    Ok(id)
}

/// Parse an optional id; an empty field means "not set"
fn parse_optional_id(value: &str, file: &str, line: usize, name: &str) -> Result<Option<u32>> {
    if value.is_empty() {
        return Ok(None);
    }
    parse_id(value, file, line, name).map(Some)
}

/// Empty text fields become `None`
fn optional_text(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse the courses.dat file
pub fn parse_courses(path: &Path) -> Result<Vec<Course>> {
    const FILE: &str = "courses.dat";
    let lines = read_lines(path)?;
    let mut courses = Vec::new();

    for (line_no, line) in data_lines(&lines) {
        let mut parts = line.split("::");

        let id = next_field(&mut parts, FILE, line_no, "courseId")?;
        let title = next_field(&mut parts, FILE, line_no, "title")?;
        let description = next_field(&mut parts, FILE, line_no, "description")?;
        let instructor_id = next_field(&mut parts, FILE, line_no, "instructorId")?;
        let department_id = next_field(&mut parts, FILE, line_no, "departmentId")?;
        let thumbnail_url = next_field(&mut parts, FILE, line_no, "thumbnailUrl")?;

        if title.is_empty() {
            return Err(CatalogError::ParseError {
                file: FILE.to_string(),
                line: line_no,
                reason: "Empty title".to_string(),
            });
        }

        courses.push(Course {
            id: parse_id(id, FILE, line_no, "courseId")?,
            title: title.to_string(),
            description: optional_text(description),
            instructor_id: parse_optional_id(instructor_id, FILE, line_no, "instructorId")?,
            department_id: parse_optional_id(department_id, FILE, line_no, "departmentId")?,
            thumbnail_url: optional_text(thumbnail_url),
        });
    }

    Ok(courses)
}

/// Parse the instructors.dat file
pub fn parse_instructors(path: &Path) -> Result<Vec<Instructor>> {
    const FILE: &str = "instructors.dat";
    let lines = read_lines(path)?;
    let mut instructors = Vec::new();

    for (line_no, line) in data_lines(&lines) {
        let mut parts = line.split("::");

        let id = next_field(&mut parts, FILE, line_no, "instructorId")?;
        let first_name = next_field(&mut parts, FILE, line_no, "firstName")?;
        let last_name = next_field(&mut parts, FILE, line_no, "lastName")?;

        instructors.push(Instructor {
            id: parse_id(id, FILE, line_no, "instructorId")?,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        });
    }

    Ok(instructors)
}

/// Parse the departments.dat file
pub fn parse_departments(path: &Path) -> Result<Vec<Department>> {
    const FILE: &str = "departments.dat";
    let lines = read_lines(path)?;
    let mut departments = Vec::new();

    for (line_no, line) in data_lines(&lines) {
        let mut parts = line.split("::");

        let id = next_field(&mut parts, FILE, line_no, "departmentId")?;
        let name = next_field(&mut parts, FILE, line_no, "name")?;

        departments.push(Department {
            id: parse_id(id, FILE, line_no, "departmentId")?,
            name: name.to_string(),
        });
    }

    Ok(departments)
}
