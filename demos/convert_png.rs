fn main() {
    use sdf_spread::prelude::*;
    use sdf_spread::pixel::image_pipeline::to_gray16;

    let glyph = image::open("images/glyph.png").unwrap().to_rgba16();

    let settings = FieldSettings {
        spread: 8.0,
        channels: ChannelSelector::ALPHA,
        crop: true,
        .. FieldSettings::default()
    };

    let field = generate_distance_field(&glyph, &settings);
    to_gray16(&field).save("images/glyph_distance.png").unwrap();
}
