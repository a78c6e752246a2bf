//! Test utilities for typedep-indexer

use std::fs;
use tempfile::TempDir;

/// Create a small C++ tree exercising every kind of reference.
///
/// `Car` inherits `Vehicle`, holds an `Engine`, and returns a `Wheel` from a
/// method. `Boat` mentions `Engine` without including its header. Anything
/// under `tests/` must be ignored.
pub fn create_test_repo() -> TempDir {
    create_repo_with_structure(&[
        (
            "include/Vehicle.h",
            r#"
#pragma once
class Vehicle {
public:
    virtual ~Vehicle();
    int speed;
};
"#,
        ),
        (
            "include/Engine.h",
            r#"
#pragma once
#include <string>
// Engine belongs to the drivetrain
enum class FuelKind { Petrol, Diesel };
struct Engine {
    FuelKind fuel;
    int horsepower;
};
"#,
        ),
        (
            "include/Wheel.hpp",
            r#"
struct Wheel {
    float radius;
};
"#,
        ),
        (
            "include/Car.h",
            r#"
#pragma once
#include "Vehicle.h"
#include "Engine.h"
#include <parts/Wheel.hpp>
#include <vector>

class Car : public Vehicle {
public:
    Wheel frontLeft() const;
private:
    Engine* engine;
    std::vector<Vehicle*> towing;
};
"#,
        ),
        (
            "src/Boat.cpp",
            r#"
#include "Vehicle.h"
class Boat : public Vehicle {
    Engine outboard;
};
"#,
        ),
        (
            "tests/CarTest.cpp",
            r#"
#include "Car.h"
class CarTest { Car car; };
"#,
        ),
    ])
}

/// Create a repository with a specific file structure
pub fn create_repo_with_structure(structure: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    for (path, content) in structure {
        let full_path = root.join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }

        fs::write(&full_path, content).unwrap();
    }

    temp_dir
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_repo() {
        let temp_dir = create_test_repo();
        let root = temp_dir.path();

        assert!(root.join("include/Car.h").exists());
        assert!(root.join("src/Boat.cpp").exists());
        assert!(root.join("tests/CarTest.cpp").exists());
    }
}
