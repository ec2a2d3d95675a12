fn main() {
    use sdf_spread::prelude::*;

    let size = 48;
    let mut mask = vec![0_u16; size * size * 4];

    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - 24.0;
            let dy = y as f32 - 24.0;

            if (dx * dx + dy * dy).sqrt() < 14.0 {
                mask[4 * (size * y + x) + 3] = u16::MAX;
            }
        }
    }

    let source = Rgba16Source::from_slice(size as u32, size as u32, &mask);
    let field = generate_distance_field(&source, &FieldSettings::default());

    // shade the field on the terminal, brightest inside
    for y in 0..field.height() {
        let row: String = (0..field.width())
            .map(|x| match field.get(x, y) / 8192 {
                0..=2 => ' ',
                3 => '.',
                4 => '+',
                5 => 'o',
                _ => '#',
            })
            .collect();

        println!("{}", row);
    }
}
