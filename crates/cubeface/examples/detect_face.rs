use cubeface::detect;
use cubeface::FaceDetectorParams;
use image::ImageReader;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("Usage: detect_face <image_path>");
        return Ok(());
    };

    let img = ImageReader::open(path)?.decode()?.to_rgb8();
    match detect::detect_face(&img, FaceDetectorParams::default()) {
        Ok(face) => {
            for row in &face.colors {
                println!("{} {} {}", row[0], row[1], row[2]);
            }
        }
        Err(err) => println!("no face detected: {err}"),
    }

    Ok(())
}
