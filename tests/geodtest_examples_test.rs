// Copyright (c) 2024-2026 Ken Barker

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.

// extern crate we're testing, same as any other code would do.
extern crate ellipsoid_geodesic;

use csv::ReaderBuilder;
use ellipsoid_geodesic::{Caps, Degrees, Ellipsoid, Metres};
use std::env;
use std::path::Path;

/// Run the direct and inverse problems against Charles Karney's geodesic
/// test set, see <https://doi.org/10.5281/zenodo.32156>.
///
/// Each line of GeodTest.dat holds lat1 lon1 azi1 lat2 lon2 azi2 s12 a12
/// m12 S12 for a geodesic calculated with high precision arithmetic.
#[test]
#[ignore]
fn test_geodesic_examples() {
    // Read GEODTEST_DIR/GeodTest.dat file and run tests
    let geoid = Ellipsoid::wgs84();

    let filename = "GeodTest.dat";
    let dir_key = "GEODTEST_DIR";

    let p = env::var(dir_key).expect("Environment variable not found: GEODTEST_DIR");
    let path = Path::new(&p);
    let file_path = path.join(filename);
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b' ')
        .from_path(file_path)
        .expect("Could not read file: GeodTest.dat");
    let mut line_number = 1;
    for result in csv_reader.records() {
        let record = result.unwrap();

        let lat1 = Degrees(record[0].parse::<f64>().unwrap());
        let lon1 = Degrees(record[1].parse::<f64>().unwrap());
        let azi1 = Degrees(record[2].parse::<f64>().unwrap());
        let lat2 = Degrees(record[3].parse::<f64>().unwrap());
        let lon2 = Degrees(record[4].parse::<f64>().unwrap());
        let azi2 = Degrees(record[5].parse::<f64>().unwrap());
        let s12 = Metres(record[6].parse::<f64>().unwrap());
        let a12 = Degrees(record[7].parse::<f64>().unwrap());

        // the inverse problem
        let result = geoid.inverse(lat1, lon1, lat2, lon2, Caps::STANDARD);

        let delta_azimuth = libm::fabs(azi1.0 - result.azi1.0);
        if 1e-8 < delta_azimuth {
            panic!(
                "azimuth, line: {:?} delta: {:?} azimuth: {:?} lon2: {:?} ",
                line_number, delta_azimuth, azi1, lon2
            );
        }

        let delta_length = libm::fabs(s12.0 - result.s12.0);
        if 1e-7 < delta_length {
            panic!(
                "length, line: {:?} delta: {:?} length: {:?} lon2: {:?} ",
                line_number, delta_length, s12, lon2
            );
        }

        let delta_arc = libm::fabs(a12.0 - result.a12.0);
        if 1e-10 < delta_arc {
            panic!(
                "arc length, line: {:?} delta: {:?} arc: {:?} lon2: {:?} ",
                line_number, delta_arc, a12, lon2
            );
        }

        // the direct problem from the first point
        let result = geoid.direct(lat1, lon1, azi1, s12, Caps::STANDARD);

        let delta_latitude = libm::fabs(lat2.0 - result.lat2.0);
        if 1e-9 < delta_latitude {
            panic!(
                "latitude, line: {:?} delta: {:?} latitude: {:?} ",
                line_number, delta_latitude, lat2
            );
        }

        let delta_longitude = libm::fabs(lon2.0 - result.lon2.0);
        if 1e-8 < delta_longitude {
            panic!(
                "longitude, line: {:?} delta: {:?} longitude: {:?} ",
                line_number, delta_longitude, lon2
            );
        }

        let delta_azimuth = libm::fabs(azi2.0 - result.azi2.0);
        if 1e-8 < delta_azimuth {
            panic!(
                "end azimuth, line: {:?} delta: {:?} azimuth: {:?} ",
                line_number, delta_azimuth, azi2
            );
        }

        line_number += 1;
    }
}
