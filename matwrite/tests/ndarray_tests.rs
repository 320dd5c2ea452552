//! Tests for the optional ndarray integration.

#![cfg(feature = "ndarray")]

mod common;

use matwrite::{MatWriter, Result};
use ndarray::{array, Array2, ShapeBuilder};

use common::{parse_file, temp_mat, Value};

#[test]
fn test_array2_dims_and_order() -> Result<()> {
    let temp = temp_mat();
    let path = temp.path();

    let standard = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
    let fortran =
        Array2::from_shape_vec((3, 2).f(), vec![1.0, 3.0, 5.0, 2.0, 4.0, 6.0]).unwrap();

    let mut writer = MatWriter::create(path, None)?;
    writer.write_array2("standard", &standard)?;
    writer.write_array2("fortran", &fortran)?;
    writer.write_array2("view", &standard.t())?;
    writer.close()?;

    let vars = parse_file(path);
    let expected = Value::double(3, 2, vec![1.0, 3.0, 5.0, 2.0, 4.0, 6.0]);
    assert_eq!(vars[0].value, expected);
    assert_eq!(vars[1].value, expected);
    assert_eq!(
        vars[2].value,
        Value::double(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
    );

    Ok(())
}

#[test]
fn test_empty_array2() -> Result<()> {
    let temp = temp_mat();
    let path = temp.path();

    let mut writer = MatWriter::create(path, None)?;
    writer.write_array2("none", &Array2::<f64>::zeros((0, 4)))?;
    writer.close()?;

    assert_eq!(parse_file(path)[0].value.dims(), (0, 4));
    Ok(())
}
