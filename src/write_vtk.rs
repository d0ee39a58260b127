use crate::array::{Array, Precision};
use crate::mesh::UnstructuredMesh;
use crate::Error;

use std::io::Write;
use std::path::Path;

use log::debug;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::writer::Writer;

/// the encoding to use when writing an inline dataarray
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Ascii,
    Base64,
}

impl Encoding {
    fn to_str(self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Base64 => "binary",
        }
    }
}

/// Write an unstructured mesh as a VTK XML `UnstructuredGrid` (`.vtu`) document
///
/// The node coordinates go to `<Points>`, the cells to `<Cells>` and the node
/// values (if the mesh carries any) to `<PointData>` under the name `values`.
pub fn write_vtu<W: Write>(
    writer: W,
    mesh: &UnstructuredMesh,
    encoding: Encoding,
) -> Result<(), Error> {
    let mut writer = Writer::new_with_indent(writer, b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let vtk_file = BytesStart::new("VTKFile").with_attributes([
        ("type", "UnstructuredGrid"),
        ("version", "1.0"),
        ("byte_order", "LittleEndian"),
        ("header_type", "UInt64"),
    ]);
    writer.write_event(Event::Start(vtk_file))?;
    writer.write_event(Event::Start(BytesStart::new("UnstructuredGrid")))?;

    let points = mesh.nodes().to_string();
    let cells = mesh.cells().to_string();
    let piece = BytesStart::new("Piece")
        .with_attributes([("NumberOfPoints", points.as_str()), ("NumberOfCells", cells.as_str())]);
    writer.write_event(Event::Start(piece))?;

    if mesh.has_values() {
        let point_data = BytesStart::new("PointData").with_attributes([("Scalars", "values")]);
        writer.write_event(Event::Start(point_data))?;

        let values: Vec<f32> = mesh.values().iter().copied().collect();
        write_inline_dataarray(
            &mut writer,
            values.as_slice(),
            Some("values"),
            mesh.veclen(),
            encoding,
        )?;

        writer.write_event(Event::End(BytesEnd::new("PointData")))?;
    }

    writer.write_event(Event::Start(BytesStart::new("Points")))?;
    let coords: Vec<f32> = mesh.coords().iter().flatten().copied().collect();
    write_inline_dataarray(&mut writer, coords.as_slice(), None, 3, encoding)?;
    writer.write_event(Event::End(BytesEnd::new("Points")))?;

    writer.write_event(Event::Start(BytesStart::new("Cells")))?;

    let connectivity: Vec<i64> = mesh.connections().iter().map(|&n| n as i64).collect();
    write_inline_dataarray(
        &mut writer,
        connectivity.as_slice(),
        Some("connectivity"),
        1,
        encoding,
    )?;

    let per_cell = mesh.cell_type().nodes_per_cell() as i64;
    let offsets: Vec<i64> = (1..=mesh.cells() as i64).map(|c| c * per_cell).collect();
    write_inline_dataarray(&mut writer, offsets.as_slice(), Some("offsets"), 1, encoding)?;

    let types = vec![mesh.cell_type().vtk_id(); mesh.cells()];
    write_inline_dataarray(&mut writer, types.as_slice(), Some("types"), 1, encoding)?;

    writer.write_event(Event::End(BytesEnd::new("Cells")))?;

    writer.write_event(Event::End(BytesEnd::new("Piece")))?;
    writer.write_event(Event::End(BytesEnd::new("UnstructuredGrid")))?;
    writer.write_event(Event::End(BytesEnd::new("VTKFile")))?;

    let mut inner = writer.into_inner();
    inner.flush()?;

    debug!(
        "wrote {} mesh with {} nodes and {} cells",
        mesh.cell_type(),
        mesh.nodes(),
        mesh.cells()
    );

    Ok(())
}

/// Create (or truncate) `path` and write the mesh to it with [`write_vtu`]
pub fn write_vtu_file<P: AsRef<Path>>(
    path: P,
    mesh: &UnstructuredMesh,
    encoding: Encoding,
) -> Result<(), Error> {
    let file = std::fs::File::create(path.as_ref())?;
    let writer = std::io::BufWriter::new(file);
    write_vtu(writer, mesh, encoding)
}

pub fn write_inline_array_header<W: Write>(
    writer: &mut Writer<W>,
    format: Encoding,
    name: Option<&str>,
    components: usize,
    precision: Precision,
) -> Result<(), Error> {
    let components = components.to_string();

    let mut element = BytesStart::new("DataArray").with_attributes([
        ("type", precision.as_str()),
        ("NumberOfComponents", components.as_str()),
    ]);

    if let Some(name) = name {
        element.push_attribute(("Name", name));
    }

    element.push_attribute(("format", format.to_str()));

    writer.write_event(Event::Start(element))?;

    Ok(())
}

pub fn close_inline_array_header<W: Write>(writer: &mut Writer<W>) -> Result<(), Error> {
    writer.write_event(Event::End(BytesEnd::new("DataArray")))?;

    Ok(())
}

/// write a single (inline) array of data (such as node values)
/// to the vtk file.
pub fn write_inline_dataarray<W: Write, A: Array + ?Sized>(
    writer: &mut Writer<W>,
    data: &A,
    name: Option<&str>,
    components: usize,
    encoding: Encoding,
) -> Result<(), Error> {
    match encoding {
        Encoding::Ascii => {
            data.write_ascii(writer, name, components)?;
        }
        Encoding::Base64 => {
            data.write_base64(writer, name, components)?;
        }
    };

    Ok(())
}
